use serde::Deserialize;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};

use crate::api::ApiVersion;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_version: ApiVersion,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    pub web_port: u16,
    pub log_level: String,
}

fn default_timeout() -> u64 {
    60
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("IMAGE_BROWSER"));

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
