//! Core data types for decoded telemetry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One named channel of a decoded frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReading {
    pub name: &'static str,
    pub value: f64,
}

/// Decoded, scaled, enum-resolved representation of one frame
///
/// Constructed fresh for each frame and handed straight to the consumer;
/// the decoder never retains one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Channels in wire order
    pub channels: Vec<ChannelReading>,
    /// Fault code, when the layout carries one
    pub fault: Option<ResolvedCode>,
    /// Operating-state code, when the layout carries one
    pub state: Option<ResolvedCode>,
}

impl Sample {
    /// Look up a channel value by name
    pub fn channel(&self, name: &str) -> Option<f64> {
        self.channels
            .iter()
            .find(|reading| reading.name == name)
            .map(|reading| reading.value)
    }
}

/// Enumerated code resolved against a lookup table
///
/// Codes absent from the table resolve to `Unknown` rather than erroring;
/// decoding continues either way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResolvedCode {
    Known { code: u8, label: String },
    Unknown { code: u8 },
}

impl ResolvedCode {
    pub fn code(&self) -> u8 {
        match self {
            ResolvedCode::Known { code, .. } => *code,
            ResolvedCode::Unknown { code } => *code,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ResolvedCode::Known { .. })
    }
}

impl fmt::Display for ResolvedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedCode::Known { label, .. } => write!(f, "{}", label),
            ResolvedCode::Unknown { code } => write!(f, "unknown ({})", code),
        }
    }
}

/// Closed mapping from small integer code to display label
///
/// Supplied as configuration alongside the wire format selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeTable {
    entries: BTreeMap<u8, String>,
}

impl CodeTable {
    /// Create an empty table (every code resolves to `Unknown`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style
    pub fn with_entry(mut self, code: u8, label: &str) -> Self {
        self.entries.insert(code, label.to_string());
        self
    }

    /// Resolve a code to its label, or the unknown sentinel
    pub fn resolve(&self, code: u8) -> ResolvedCode {
        match self.entries.get(&code) {
            Some(label) => ResolvedCode::Known {
                code,
                label: label.clone(),
            },
            None => ResolvedCode::Unknown { code },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fault codes reported by the controller firmware
    pub fn default_faults() -> Self {
        Self::new()
            .with_entry(0, "no fault")
            .with_entry(1, "no run")
            .with_entry(2, "V limit")
            .with_entry(3, "I limit")
            .with_entry(4, "no IQ")
    }

    /// Operating states reported by the controller firmware
    pub fn default_states() -> Self {
        Self::new()
            .with_entry(0, "stopped")
            .with_entry(1, "running")
            .with_entry(2, "fault")
    }
}
