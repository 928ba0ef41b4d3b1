//! Sample output formatting
//!
//! Rendering is a consumer of the decoded sequence; the decoder itself never
//! depends on anything here.

use crate::core::Sample;

/// Renders one decoded sample as a line of output
pub trait SampleFormatter {
    fn format_sample(&self, sample: &Sample) -> String;
}

/// Fixed-width console line, one channel after another
pub struct TextFormatter {
    /// Decimal places for channel values
    pub precision: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl SampleFormatter for TextFormatter {
    fn format_sample(&self, sample: &Sample) -> String {
        let mut parts: Vec<String> = sample
            .channels
            .iter()
            .map(|c| format!("{}: {:8.*}", c.name, self.precision, c.value))
            .collect();

        if let Some(fault) = &sample.fault {
            parts.push(format!("fault: {}", fault));
        }
        if let Some(state) = &sample.state {
            parts.push(format!("state: {}", state));
        }

        parts.join("   ")
    }
}

/// JSON object per sample
pub struct JsonFormatter;

impl SampleFormatter for JsonFormatter {
    fn format_sample(&self, sample: &Sample) -> String {
        serde_json::to_string(sample).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Comma-separated values, one row per sample
pub struct CsvFormatter;

impl CsvFormatter {
    /// Header row matching `format_sample`'s column order
    pub fn header(&self, sample: &Sample) -> String {
        let mut columns: Vec<&str> = sample.channels.iter().map(|c| c.name).collect();
        if sample.fault.is_some() {
            columns.push("fault");
        }
        if sample.state.is_some() {
            columns.push("state");
        }
        columns.join(",")
    }
}

impl SampleFormatter for CsvFormatter {
    fn format_sample(&self, sample: &Sample) -> String {
        let mut columns: Vec<String> = sample
            .channels
            .iter()
            .map(|c| c.value.to_string())
            .collect();
        if let Some(fault) = &sample.fault {
            columns.push(fault.to_string());
        }
        if let Some(state) = &sample.state {
            columns.push(state.to_string());
        }
        columns.join(",")
    }
}
