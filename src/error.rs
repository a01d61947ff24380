//! Error types for uber-ads-mcp configuration.
//!
//! # Security Note
//!
//! Error messages name the offending environment variable but NEVER include
//! its value, so credentials cannot leak through error output.

use thiserror::Error;

/// Errors that can occur while loading configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("missing required environment variable: {name}")]
    MissingVar {
        /// Name of the environment variable.
        name: &'static str,
    },

    /// An environment variable holds a value this server cannot use.
    #[error("invalid value for {name}: {message}")]
    InvalidVar {
        /// Name of the environment variable.
        name: &'static str,
        /// Description of the validation failure (never the value itself).
        message: String,
    },
}
