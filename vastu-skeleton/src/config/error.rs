//! Configuration errors.

use thiserror::Error;

/// Failure to load or validate a [`SkeletonConfig`](super::SkeletonConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid YAML for this schema
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
