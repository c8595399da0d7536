use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub bot: BotSettings,
}

#[derive(Deserialize, Clone)]
pub struct BotSettings {
    pub token: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub owner_chat_id: u64,
    pub media_dir: PathBuf,
    pub results_dir: PathBuf,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reminder_interval_secs: u64,
}

impl BotSettings {
    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs)
    }
}

#[derive(Deserialize, Clone)]
pub struct AppSettings {
    pub host: IpAddr,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl AppSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "Unsupported environment type: {}. Use `local` or `production`",
                other
            )),
        }
    }
}

pub fn get_config() -> Result<Settings, config::ConfigError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");
    let config_dir: PathBuf = std::env::var("CONFIG_DIR")
        .unwrap_or_else(|_| match environment {
            Environment::Local => "configuration".into(),
            Environment::Production => "/etc/onboarding-bot".into(),
        })
        .into();
    config::Config::builder()
        .add_source(config::File::from(config_dir.join("base")).required(true))
        .add_source(config::File::from(config_dir.join(environment.as_str())).required(true))
        .add_source(config::Environment::with_prefix("app"))
        .build()?
        .try_deserialize()
}
