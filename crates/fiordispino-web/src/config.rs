use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result};
use fiordispino_core::Config;
use tracing::{info, warn};

pub const ENV_PORT: &str = "FIORDISPINO_PORT";

/// Directory for rolling log files; stderr only when unset
pub const ENV_LOG_DIR: &str = "FIORDISPINO_LOG_DIR";

const DEFAULT_PORT: &str = "5173";

pub struct WebConfig {
    pub port: u16,
    pub client: Config,
}

impl WebConfig {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load(ENV_PORT, DEFAULT_PORT)?,
            client: Config::load().context("Failed to load client configuration")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("Invalid {} value {:?}: {}", key, value, e)
    })
}
