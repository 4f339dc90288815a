//! Configuration loading for the process
//!
//! Handles:
//! - Environment-specific `.env` files (`.env.development`, ...)
//! - A plain `.env` file as fallback
//! - Validation of the assembled `AppConfig`

use tracing::debug;

use loop_shared::config::{AppConfig, Environment};

use crate::InfrastructureError;

/// Loads `.env` files, reads `AppConfig` from the environment and validates it
///
/// Variables already set in the process take precedence over both files.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    let environment = Environment::from_env();
    load_env_file(environment.env_file())?;
    load_env_file(".env")?;

    let config = AppConfig::from_env();
    config.validate().map_err(InfrastructureError::Config)?;
    Ok(config)
}

fn load_env_file(name: &str) -> Result<(), InfrastructureError> {
    match dotenvy::from_filename(name) {
        Ok(path) => {
            debug!(path = %path.display(), "Loaded environment file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(InfrastructureError::Config(format!(
            "Failed to load {}: {}",
            name, e
        ))),
    }
}
