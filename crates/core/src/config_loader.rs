use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging defaults, TOML, environment variables, and JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load() -> Result<AppConfig> {
        Self::extract(Self::base().merge(Env::prefixed("BOOKIEX_").split("__")))
    }

    /// Loads configuration with a specific profile layered over the base file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        Self::extract(
            Self::base()
                .merge(Toml::file(format!("config/Config.{profile}.toml")))
                .merge(Env::prefixed("BOOKIEX_").split("__")),
        )
    }

    /// Loads configuration from an explicit TOML path plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or validation fails.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        Self::extract(
            Figment::from(Serialized::defaults(AppConfig::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed("BOOKIEX_").split("__")),
        )
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("config/Config.toml"))
    }

    fn extract(figment: Figment) -> Result<AppConfig> {
        let config: AppConfig = figment.join(Json::file("config/Config.json")).extract()?;
        config.validate()?;

        tracing::debug!(
            models = ?config.models.order,
            odds_source = ?config.models.odds_source,
            "Configuration loaded"
        );

        Ok(config)
    }
}
