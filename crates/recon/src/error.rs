use thiserror::Error;

/// Errors raised while loading engine configuration.
///
/// The engine itself has no error states: missing fields and empty
/// datasets fall back to alias defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config validation error (empty alias list, blank label, etc.).
    #[error("config validation error: {0}")]
    Validation(String),
    /// Config file could not be read.
    #[error("cannot read config {path}: {message}")]
    Io { path: String, message: String },
}
