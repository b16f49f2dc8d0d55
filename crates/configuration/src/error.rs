use thiserror::Error;

/// Errors raised while assembling [`Settings`](crate::settings::Settings) or
/// acting on them.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file or a `TRADEMASTER__*` variable could not be read, or
    /// did not fit the settings schema.
    #[error("Failed to load settings from the config file or environment: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid report filter settings: {0}")]
    InvalidFilter(String),

    #[error("Failed to set up logging: {0}")]
    Logging(String),
}
