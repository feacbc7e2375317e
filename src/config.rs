use std::{env, fmt::Display, net::IpAddr, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

const MIN_SECRET_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub secret_key: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load("OCCASIO_HOST", "127.0.0.1")?,
            port: try_load("OCCASIO_PORT", "5000")?,
            db_path: try_load("OCCASIO_DB_PATH", "db")?,
            secret_key: load_secret("SECRET_KEY")?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}

fn load_secret(key: &'static str) -> Result<String, ConfigError> {
    let secret = env::var(key)
        .map(|s| s.trim().to_string())
        .map_err(|_| ConfigError::Missing(key))?;

    if secret.is_empty() {
        return Err(ConfigError::Missing(key));
    }
    if secret.len() < MIN_SECRET_LEN {
        warn!("{key} is shorter than {MIN_SECRET_LEN} bytes, sessions are easier to forge");
    }
    Ok(secret)
}
