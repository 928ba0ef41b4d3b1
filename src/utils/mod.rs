pub mod config;

pub use config::{ConfigError, FilterConfig, SessionConfig};
