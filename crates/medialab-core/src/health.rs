//! Liveness checks against the peer service.
//!
//! Failures never escape as errors from [`check_service_status`]; they are
//! folded into a degraded status that still names the cause.

use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};

use crate::constants::endpoints;
use crate::error::UpstreamError;
use crate::models::{PeerStatus, ServiceStatus, StatusResponse};
use crate::util::{join_url, sanitize};

pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// GET `url`, failing on transport errors and non-success statuses.
async fn fetch(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<reqwest::Response, UpstreamError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|error| UpstreamError::from_reqwest(&error))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::http(status, &body));
    }
    Ok(response)
}

/// GET `url` and return its JSON body, classifying any failure.
pub async fn probe(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Value, UpstreamError> {
    fetch(client, url, timeout)
        .await?
        .json::<Value>()
        .await
        .map_err(|error| UpstreamError::Decode(sanitize(&error)))
}

/// Reachability of the peer's root endpoint. Any success status counts,
/// whatever the body.
pub async fn peer_status(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> Result<PeerStatus, UpstreamError> {
    fetch(client, &join_url(base_url, endpoints::ROOT), timeout)
        .await
        .map(|_| PeerStatus::Connected)
}

/// Status of the service at `base_url`, as seen from here.
pub async fn check_service_status(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> StatusResponse {
    let root = match fetch(client, &join_url(base_url, endpoints::ROOT), timeout).await {
        Ok(response) => Ok(response.json::<Value>().await.unwrap_or(Value::Null)),
        Err(error) => Err(error),
    };
    match root {
        Ok(response) => StatusResponse {
            status: ServiceStatus::Running,
            version: response
                .get("version")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            timestamp: Utc::now(),
            details: Some(json!({ "response": response })),
        },
        Err(error) => {
            tracing::debug!(
                peer = base_url,
                reason = error.reason(),
                %error,
                "Peer status check failed"
            );
            StatusResponse {
                status: error.service_status(),
                version: "unknown".to_string(),
                timestamp: Utc::now(),
                details: Some(json!({
                    "error": error.to_string(),
                    "reason": error.reason(),
                })),
            }
        }
    }
}
