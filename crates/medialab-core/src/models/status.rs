//! Service status models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::API_VERSION;

/// Health of a service as reported by `/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Running,
    Error,
    Disconnected,
}

/// Reachability of the peer as seen from one service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerStatus {
    Connected,
    Error,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ServiceStatus,
    pub version: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl StatusResponse {
    /// Status of the local, answering service
    pub fn running() -> Self {
        Self {
            status: ServiceStatus::Running,
            version: API_VERSION.to_string(),
            timestamp: Utc::now(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(
            serde_json::to_value(ServiceStatus::Disconnected).unwrap(),
            "disconnected"
        );
        assert_eq!(serde_json::to_value(PeerStatus::Connected).unwrap(), "connected");
    }

    #[test]
    fn running_reports_api_version() {
        let status = StatusResponse::running();
        assert_eq!(status.status, ServiceStatus::Running);
        assert_eq!(status.version, API_VERSION);
        assert!(status.details.is_none());
    }
}
