use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

/// Environment variable prefix, e.g. `TICK_ORACLE_ENGINE__LEARNING_RATE=0.2`.
pub const ENV_PREFIX: &str = "TICK_ORACLE_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration from `config/Config.toml` and the environment.
    ///
    /// Missing files fall back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed or the
    /// engine section fails validation.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads application configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the engine section
    /// fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        config.engine.validate()?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Loads application configuration with a specific profile overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed or the engine
    /// section fails validation.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file("config/Config.toml"))
            .merge(Toml::file(format!("config/Config.{profile}.toml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration profile {profile}"))?;

        config.engine.validate()?;
        Ok(config)
    }
}
