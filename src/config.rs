use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::kubernetes::ALL_NAMESPACES;

pub const APP_NAME: &str = "podwatch";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Possible errors from configuration files manipulation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Cannot read/write configuration file.
    #[error("cannot read/write configuration file")]
    IoError(#[from] std::io::Error),

    /// Cannot serialize/deserialize configuration.
    #[error("cannot serialize/deserialize configuration")]
    SerializationError(#[from] serde_yaml::Error),
}

/// Application configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    /// Namespaces to poll, `all` selects every namespace in the cluster.
    #[serde(default = "default_namespaces")]
    pub namespaces: Vec<String>,

    /// Seconds between two polls in monitor mode.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_namespaces() -> Vec<String> {
    vec![ALL_NAMESPACES.to_owned()]
}

fn default_interval() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespaces: default_namespaces(),
            interval: default_interval(),
        }
    }
}

impl Config {
    /// Returns the default configuration path: `HOME/.podwatch/config.yaml`.
    pub fn default_path() -> PathBuf {
        match std::env::home_dir() {
            Some(path) => path.join(format!(".{APP_NAME}")).join("config.yaml"),
            None => PathBuf::from("config.yaml"),
        }
    }

    /// Loads the configuration from a file or creates a default one if the file does not exist.
    pub async fn load_or_create() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        match Self::load(&path).await {
            Ok(config) => Ok(config),
            Err(ConfigError::SerializationError(error)) => {
                tracing::error!("Cannot deserialize config: {}", error);
                Ok(Config::default())
            },
            Err(_) => {
                let config = Config::default();
                if let Some(dir) = path.parent() {
                    tokio::fs::create_dir_all(dir).await?;
                }
                config.save(&path).await?;
                Ok(config)
            },
        }
    }

    async fn load(path: &Path) -> Result<Config, ConfigError> {
        let mut file = File::open(path).await?;

        let mut config_str = String::new();
        file.read_to_string(&mut config_str).await?;

        Ok(serde_yaml::from_str::<Config>(&config_str)?)
    }

    async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config_str = serde_yaml::to_string(self)?;

        let mut file = File::create(path).await?;
        file.write_all(config_str.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
