use std::collections::HashMap;
use std::env;
use std::time::Duration;

use medialab_core::config::{bounded_u64, http_base_url, value_or_default, ConfigError};
use medialab_core::constants::{CLIENT_HOST, CLIENT_PORT, SERVER_URL};
use medialab_core::health::DEFAULT_STATUS_TIMEOUT;
use medialab_core::relay::DEFAULT_QUEUE_CAPACITY;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub bind_addr: String,
    pub server_url: String,
    pub request_timeout: Duration,
    pub status_timeout: Duration,
    pub processing_delay: Duration,
    pub notify_queue_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("{CLIENT_HOST}:{CLIENT_PORT}"),
            server_url: SERVER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            processing_delay: DEFAULT_PROCESSING_DELAY,
            notify_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = value_or_default(&lookup, "MEDIALAB_CLIENT_BIND_ADDR", &defaults.bind_addr);
        let server_url = http_base_url(&lookup, "MEDIALAB_SERVER_URL", &defaults.server_url)?;

        let request_timeout_secs = bounded_u64(
            &lookup,
            "MEDIALAB_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
            1..=120,
        )?;
        let status_timeout_secs = bounded_u64(
            &lookup,
            "MEDIALAB_STATUS_TIMEOUT_SECS",
            defaults.status_timeout.as_secs(),
            1..=30,
        )?;
        let processing_delay_ms = bounded_u64(
            &lookup,
            "MEDIALAB_PROCESSING_DELAY_MS",
            u64::try_from(defaults.processing_delay.as_millis()).unwrap_or(u64::MAX),
            0..=60_000,
        )?;
        let notify_queue_capacity = bounded_u64(
            &lookup,
            "MEDIALAB_NOTIFY_QUEUE_CAPACITY",
            defaults.notify_queue_capacity as u64,
            1..=65_536,
        )?;

        Ok(Self {
            bind_addr,
            server_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            status_timeout: Duration::from_secs(status_timeout_secs),
            processing_delay: Duration::from_millis(processing_delay_ms),
            notify_queue_capacity: usize::try_from(notify_queue_capacity)
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(map: &HashMap<&str, &str>) -> Result<ClientConfig, ConfigError> {
        ClientConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn config_defaults_match_well_known_ports() {
        let config = config_from(&HashMap::new()).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:4810");
        assert_eq!(config.server_url, "http://localhost:4800");
        assert_eq!(config.processing_delay, Duration::from_secs(1));
        assert_eq!(config.status_timeout, Duration::from_secs(2));
    }

    #[test]
    fn config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("MEDIALAB_SERVER_URL", "https://items.example.com/");
        map.insert("MEDIALAB_PROCESSING_DELAY_MS", "0");
        map.insert("MEDIALAB_REQUEST_TIMEOUT_SECS", "30");

        let config = config_from(&map).unwrap();
        assert_eq!(config.server_url, "https://items.example.com");
        assert_eq!(config.processing_delay, Duration::ZERO);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_rejects_invalid_values() {
        let mut map = HashMap::new();
        map.insert("MEDIALAB_PROCESSING_DELAY_MS", "soon");
        let err = config_from(&map).unwrap_err();
        assert!(err.to_string().contains("MEDIALAB_PROCESSING_DELAY_MS"));

        let mut map = HashMap::new();
        map.insert("MEDIALAB_NOTIFY_QUEUE_CAPACITY", "0");
        assert!(config_from(&map).is_err());
    }
}
