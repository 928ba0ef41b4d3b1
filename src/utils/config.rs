//! Session configuration: wire format selection, code tables, filter tuning

use crate::core::CodeTable;
use crate::processing::layout::FrameFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Estimator tuning parameters
///
/// Supplied once at construction time and immutable thereafter; they fully
/// determine the discretized process-noise matrix and the measurement update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Fixed interval between successive measurements (seconds)
    pub sample_interval_s: f64,
    /// Process-noise spectral density of the constant-velocity model
    pub process_noise: f64,
    /// Measurement-noise variance of the observed channel
    pub measurement_noise: f64,
    /// Initial diagonal covariance scale
    pub initial_covariance: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        // Bench-tuned values for the output-voltage channel at the ADC's
        // native sample rate.
        Self {
            sample_interval_s: 1.10857e-5,
            process_noise: 1e6,
            measurement_noise: 1.0,
            initial_covariance: 1e-3,
        }
    }
}

/// Complete per-session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Wire format in use on this link; selected here, never auto-detected
    pub format: FrameFormat,
    /// Fault-code lookup table
    pub fault_codes: CodeTable,
    /// Operating-state lookup table
    pub state_codes: CodeTable,
    /// Estimator tuning
    pub filter: FilterConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            format: FrameFormat::V3,
            fault_codes: CodeTable::default_faults(),
            state_codes: CodeTable::default_states(),
            filter: FilterConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Parameter outside its valid range
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => write!(f, "I/O error: {}", message),
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl FilterConfig {
    /// Check that every tuning parameter is in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("sample_interval_s", self.sample_interval_s),
            ("process_noise", self.process_noise),
            ("measurement_noise", self.measurement_noise),
            ("initial_covariance", self.initial_covariance),
        ];
        for (parameter, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.to_string(),
                    reason: "must be a positive finite number".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SessionConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filter.validate()
    }
}
