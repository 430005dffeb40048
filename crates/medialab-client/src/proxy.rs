//! HTTP forwarding of item CRUD to the item server.

use std::time::Duration;

use medialab_core::constants::{endpoints, item_path};
use medialab_core::util::{join_url, sanitize};
use medialab_core::{Item, UpstreamError};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Thin reqwest wrapper around the server's `/items` routes.
#[derive(Debug, Clone)]
pub struct ItemProxy {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ItemProxy {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list(&self) -> Result<Vec<Item>> {
        self.send(self.client.get(self.url(endpoints::ITEMS))).await
    }

    pub async fn get(&self, id: u64) -> Result<Item> {
        self.send(self.client.get(self.url(&item_path(id)))).await
    }

    pub async fn create(&self, item: &Item) -> Result<Item> {
        self.send(self.client.post(self.url(endpoints::ITEMS)).json(item))
            .await
    }

    pub async fn update(&self, id: u64, item: &Item) -> Result<Item> {
        self.send(self.client.put(self.url(&item_path(id))).json(item))
            .await
    }

    /// Returns the server's confirmation body unchanged.
    pub async fn delete(&self, id: u64) -> Result<Value> {
        self.send(self.client.delete(self.url(&item_path(id)))).await
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|error| UpstreamError::from_reqwest(&error))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::http(status.as_u16(), &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|error| UpstreamError::Decode(sanitize(&error)))
}
