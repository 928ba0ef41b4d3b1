//! Output surfaces over the decoded sample sequence

pub mod formatting;

pub use formatting::{CsvFormatter, JsonFormatter, SampleFormatter, TextFormatter};
