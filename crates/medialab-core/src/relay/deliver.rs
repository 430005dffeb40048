use std::time::Duration;

use crate::constants::endpoints;
use crate::error::UpstreamError;
use crate::models::Notification;
use crate::util::{join_url, sanitize};

pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts notifications to a peer's `/server-communication/notify` inbox.
#[derive(Debug, Clone)]
pub struct NotificationRelay {
    client: reqwest::Client,
    timeout: Duration,
}

impl NotificationRelay {
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), timeout)
    }

    pub const fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Deliver once. Returns the notification as stored by the peer (with the
    /// peer-assigned id), or the reason delivery failed. Never retries.
    pub async fn deliver(
        &self,
        notification: &Notification,
        target_base_url: &str,
    ) -> Result<Notification, UpstreamError> {
        let url = join_url(target_base_url, endpoints::NOTIFY);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(notification)
            .send()
            .await
            .map_err(|error| UpstreamError::from_reqwest(&error))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::http(status, &body));
        }

        response
            .json::<Notification>()
            .await
            .map_err(|error| UpstreamError::Decode(sanitize(&error)))
    }
}

impl Default for NotificationRelay {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_TIMEOUT)
    }
}
