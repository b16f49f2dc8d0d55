use crate::error::ConfigError;
use crate::settings::Settings;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{LoggingSettings, ReportSettings};

/// The configuration file read by [`load_config`].
pub const DEFAULT_CONFIG_FILE: &str = "journal.toml";

/// Prefix of environment variables that override file settings,
/// e.g. `TRADEMASTER__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "TRADEMASTER";

/// Loads the application configuration from `journal.toml` and the environment.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Loads the application configuration from the given file.
///
/// Sources are layered in order, later ones winning:
/// 1. The TOML file at `path` (optional; built-in defaults apply without it).
/// 2. Environment variables prefixed with `TRADEMASTER`, using `__` as separator.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    load_layered(path.as_ref(), None)
}

/// Builds the layered settings. `env` replaces the process environment as the
/// source of `TRADEMASTER__*` variables when given.
fn load_layered(
    path: &Path,
    env: Option<config::Map<String, String>>,
) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .source(env),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;

    tracing::debug!(?settings, "Configuration loaded.");
    Ok(settings)
}
