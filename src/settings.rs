use std::path::Path;

use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_API_HOST, DEFAULT_MASS_KG};

/// Where acceleration curves are fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub api_host: String,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            api_host: DEFAULT_API_HOST.to_string(),
            auth_token: None,
        }
    }
}

impl ApiConfig {
    pub fn new(api_host: impl Into<String>) -> Self {
        ApiConfig {
            api_host: api_host.into(),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_host: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    pub mass_kg: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_host: DEFAULT_API_HOST.to_string(),
            auth_token: None,
            mass_kg: DEFAULT_MASS_KG,
        }
    }
}

impl AppConfig {
    const API_HOST: &'static str = "api_host";
    const MASS_KG: &'static str = "mass_kg";
    pub const CONFIG_FILENAME: &'static str = "tpspd";
    pub const ENV_PREFIX: &'static str = "TPSPD";

    /// Layers defaults, an optional config file and `TPSPD_*` environment
    /// variables. Without an explicit path, `tpspd.toml` in the working
    /// directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(AppConfig::CONFIG_FILENAME).required(false),
        };

        let settings = Config::builder()
            .set_default(AppConfig::API_HOST, DEFAULT_API_HOST)?
            .set_default(AppConfig::MASS_KG, DEFAULT_MASS_KG)?
            .add_source(file)
            .add_source(config::Environment::with_prefix(AppConfig::ENV_PREFIX))
            .build()?;

        let app_config: AppConfig = settings.try_deserialize()?;
        if app_config.auth_token.is_none() {
            warn!(
                api_host = %app_config.api_host,
                "no auth token configured, requests will be sent unauthenticated"
            );
        }
        debug!(?app_config, "configuration loaded");
        Ok(app_config)
    }

    pub fn api(&self) -> ApiConfig {
        ApiConfig {
            api_host: self.api_host.clone(),
            auth_token: self.auth_token.clone(),
        }
    }
}
