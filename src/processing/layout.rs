//! Versioned wire layouts for the telemetry frame
//!
//! The link carries no version byte: several frame shapes coexist in the
//! field, and the one in use is selected per session by configuration, never
//! sniffed from content.

use crate::core::MAGIC_LEN;
use serde::{Deserialize, Serialize};

/// Telemetry schema versions seen in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameFormat {
    /// Six analog rails, one quantized setpoint, fault byte, pad byte
    V1,
    /// Six analog rails plus the control term, setpoint, fault and state bytes
    V2,
    /// Six analog rails and both quantized setpoints (current firmware)
    V3,
}

/// Linear calibration from raw wire units to physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub gain: f64,
    pub offset: f64,
}

impl Scale {
    pub const IDENTITY: Scale = Scale {
        gain: 1.0,
        offset: 0.0,
    };

    pub fn new(gain: f64, offset: f64) -> Self {
        Self { gain, offset }
    }

    pub fn apply(self, raw: f64) -> f64 {
        raw * self.gain + self.offset
    }
}

/// Typed payload field kinds, in wire order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// 32-bit little-endian float analog channel
    Analog { scale: Scale },
    /// 16-bit little-endian unsigned quantized setpoint
    Setpoint { scale: Scale },
    /// 8-bit enumerated fault code
    Fault,
    /// 8-bit enumerated operating-state code
    State,
    /// Explicit padding byte, discarded
    Padding,
}

impl FieldKind {
    /// Width of this field on the wire, in bytes
    pub fn width(&self) -> usize {
        match self {
            FieldKind::Analog { .. } => 4,
            FieldKind::Setpoint { .. } => 2,
            FieldKind::Fault | FieldKind::State | FieldKind::Padding => 1,
        }
    }
}

/// One named payload field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn analog(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Analog {
                scale: Scale::IDENTITY,
            },
        }
    }

    pub fn scaled_analog(name: &'static str, scale: Scale) -> Self {
        Self {
            name,
            kind: FieldKind::Analog { scale },
        }
    }

    pub fn setpoint(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Setpoint {
                scale: Scale::IDENTITY,
            },
        }
    }

    pub fn scaled_setpoint(name: &'static str, scale: Scale) -> Self {
        Self {
            name,
            kind: FieldKind::Setpoint { scale },
        }
    }

    pub fn fault() -> Self {
        Self {
            name: "fault",
            kind: FieldKind::Fault,
        }
    }

    pub fn state() -> Self {
        Self {
            name: "state",
            kind: FieldKind::State,
        }
    }

    pub fn padding() -> Self {
        Self {
            name: "_pad",
            kind: FieldKind::Padding,
        }
    }
}

/// Ordered field list plus header geometry for one schema version
///
/// The payload length is fixed and fully determined by the field list; a
/// short read before the next marker boundary is a desynchronization signal,
/// not a schema ambiguity.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    fields: Vec<FieldSpec>,
    header_words: usize,
}

impl FrameLayout {
    /// Layout for one of the known schema versions
    pub fn for_format(format: FrameFormat) -> Self {
        let rails = [
            FieldSpec::analog("v_in"),
            FieldSpec::analog("i_in"),
            FieldSpec::analog("v_out"),
            FieldSpec::analog("i_out"),
            FieldSpec::analog("v_q"),
            FieldSpec::analog("i_q"),
        ];

        match format {
            FrameFormat::V1 => {
                let mut fields = rails.to_vec();
                fields.push(FieldSpec::setpoint("ref_i_q"));
                fields.push(FieldSpec::fault());
                fields.push(FieldSpec::padding());
                Self {
                    fields,
                    header_words: 7,
                }
            }
            FrameFormat::V2 => {
                let mut fields = rails.to_vec();
                fields.push(FieldSpec::analog("pid_term"));
                fields.push(FieldSpec::setpoint("ref_i_q"));
                fields.push(FieldSpec::fault());
                fields.push(FieldSpec::state());
                Self {
                    fields,
                    header_words: 8,
                }
            }
            FrameFormat::V3 => {
                let mut fields = rails.to_vec();
                fields.push(FieldSpec::setpoint("ref_v_q"));
                fields.push(FieldSpec::setpoint("ref_i_q"));
                Self {
                    fields,
                    header_words: 7,
                }
            }
        }
    }

    /// Build a layout from an explicit field list (calibrated captures,
    /// bench experiments)
    pub fn custom(fields: Vec<FieldSpec>, header_words: usize) -> Self {
        Self {
            fields,
            header_words,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Payload bytes following the marker
    pub fn payload_len(&self) -> usize {
        self.fields.iter().map(|f| f.kind.width()).sum()
    }

    /// One marker-prefixed frame on the wire
    pub fn frame_len(&self) -> usize {
        MAGIC_LEN + self.payload_len()
    }

    /// Header segment skipped once after first alignment
    pub fn header_len(&self) -> usize {
        self.header_words * 4
    }
}
