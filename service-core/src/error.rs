use thiserror::Error;

/// Infrastructure failures raised while bootstrapping a binary.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration file not found: {0}")]
    MissingConfigFile(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
