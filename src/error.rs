//! Error types and handling for the snow day calculator

use thiserror::Error;

/// Main error type for the snow day calculator
#[derive(Error, Debug)]
pub enum SnowDayError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors (weather readings, weights, postal codes)
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl SnowDayError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SnowDayError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            SnowDayError::Validation { message } => {
                format!("Invalid input: {message}")
            }
        }
    }
}
