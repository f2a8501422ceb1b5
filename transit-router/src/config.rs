//! Server configuration, read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Configuration for the routing server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Map data JSON file (`MAP_DATA_PATH`).
    pub map_data_path: PathBuf,

    /// Listen address (`BIND_ADDR`).
    pub bind_addr: SocketAddr,

    /// How often to reload the map data (`RELOAD_INTERVAL_SECS`).
    /// `None` disables periodic reloads.
    pub reload_interval: Option<Duration>,

    /// Route cache settings (`ROUTE_CACHE_TTL_SECS`, `ROUTE_CACHE_CAPACITY`).
    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            map_data_path: PathBuf::from("data/map_data.json"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            reload_interval: None,
            cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("MAP_DATA_PATH") {
            config.map_data_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = parse("BIND_ADDR", addr)?;
        }
        if let Some(secs) = lookup("RELOAD_INTERVAL_SECS") {
            let secs: u64 = parse("RELOAD_INTERVAL_SECS", secs)?;
            config.reload_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = lookup("ROUTE_CACHE_TTL_SECS") {
            config.cache.ttl = Duration::from_secs(parse("ROUTE_CACHE_TTL_SECS", secs)?);
        }
        if let Some(capacity) = lookup("ROUTE_CACHE_CAPACITY") {
            config.cache.max_capacity = parse("ROUTE_CACHE_CAPACITY", capacity)?;
        }

        Ok(config)
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        reason: e.to_string(),
        value,
    })
}
