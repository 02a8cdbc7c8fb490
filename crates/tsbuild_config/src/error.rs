//! Error types for configuration loading.
//!
//! These cover problems with the file itself. Problems with property values
//! are not errors here: the resolver collects them as diagnostics on the
//! resolved options instead.

/// Errors that can occur when loading a `tsbuild.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A referenced target name does not exist in the configuration.
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A section has the wrong shape.
    #[error("validation error: {0}")]
    ValidationError(String),
}
