//! Configuration error type.
//!
//! Every `ConfigError` is fatal at startup: parameters are validated once
//! when loaded, never rediscovered mid-search.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter `{field}`: {reason}")]
    Invalid {
        field:  &'static str,
        reason: String,
    },

    #[error("cannot read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse parameter file: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
