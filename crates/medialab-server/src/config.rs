use std::collections::HashMap;
use std::env;
use std::time::Duration;

use medialab_core::config::{bounded_u64, http_base_url, value_or_default, ConfigError};
use medialab_core::constants::{CLIENT_URL, SERVER_HOST, SERVER_PORT};
use medialab_core::health::DEFAULT_STATUS_TIMEOUT;
use medialab_core::relay::{DEFAULT_QUEUE_CAPACITY, DEFAULT_RELAY_TIMEOUT};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub client_url: String,
    pub relay_timeout: Duration,
    pub status_timeout: Duration,
    pub notify_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("{SERVER_HOST}:{SERVER_PORT}"),
            client_url: CLIENT_URL.to_string(),
            relay_timeout: DEFAULT_RELAY_TIMEOUT,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            notify_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = value_or_default(&lookup, "MEDIALAB_SERVER_BIND_ADDR", &defaults.bind_addr);
        let client_url = http_base_url(&lookup, "MEDIALAB_CLIENT_URL", &defaults.client_url)?;

        let relay_timeout_secs = bounded_u64(
            &lookup,
            "MEDIALAB_RELAY_TIMEOUT_SECS",
            defaults.relay_timeout.as_secs(),
            1..=60,
        )?;
        let status_timeout_secs = bounded_u64(
            &lookup,
            "MEDIALAB_STATUS_TIMEOUT_SECS",
            defaults.status_timeout.as_secs(),
            1..=30,
        )?;
        let notify_queue_capacity = bounded_u64(
            &lookup,
            "MEDIALAB_NOTIFY_QUEUE_CAPACITY",
            defaults.notify_queue_capacity as u64,
            1..=65_536,
        )?;

        Ok(Self {
            bind_addr,
            client_url,
            relay_timeout: Duration::from_secs(relay_timeout_secs),
            status_timeout: Duration::from_secs(status_timeout_secs),
            notify_queue_capacity: usize::try_from(notify_queue_capacity)
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
        })
    }
}
