use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use medialab_core::constants::{endpoints, API_VERSION};
use medialab_core::health::{check_service_status, probe};
use medialab_core::relay::{NotificationQueue, NotificationRelay, RelayDelivery};
use medialab_core::util::join_url;
use medialab_core::{Item, StatusResponse};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::service::ItemService;
use crate::store::InMemoryItemRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    items: ItemService,
    http: reqwest::Client,
}

impl AppState {
    /// Wire the in-memory store to a relay worker targeting the client.
    pub fn from_config(config: Arc<ServerConfig>) -> Self {
        let relay = NotificationRelay::new(config.relay_timeout);
        let queue = NotificationQueue::spawn(
            "client-relay",
            RelayDelivery::new(relay, config.client_url.clone()),
            config.notify_queue_capacity,
        );
        let items = ItemService::new(Arc::new(InMemoryItemRepository::new()), queue);
        Self::new(config, items)
    }

    pub fn new(config: Arc<ServerConfig>, items: ItemService) -> Self {
        Self {
            config,
            items,
            http: reqwest::Client::new(),
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(root))
        .route(endpoints::STATUS, get(status))
        .route(endpoints::ITEMS, get(list_items).post(create_item))
        .route(
            endpoints::ITEM,
            get(get_item).put(update_item).delete(delete_item),
        )
        .route(endpoints::CLIENT_STATUS, get(client_status))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
    version: &'static str,
    client_url: String,
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to MediaLab API",
        version: API_VERSION,
        client_url: state.config.client_url.clone(),
    })
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let client = check_service_status(
        &state.http,
        &state.config.client_url,
        state.config.status_timeout,
    )
    .await;
    Json(StatusResponse::running().with_details(json!({
        "items_count": state.items.count(),
        "dropped_notifications": state.items.dropped_notifications(),
        "client": client,
    })))
}

async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.items.list())
}

/// Non-integer ids are a validation error; negative ones can never match.
fn item_id(path: Result<Path<i64>, PathRejection>) -> Result<u64, AppError> {
    let Path(id) = path?;
    u64::try_from(id).map_err(|_| AppError::NotFound(id))
}

async fn get_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(state.items.get(item_id(path)?)?))
}

async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<Item>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Json(item) = payload?;
    Ok(Json(state.items.create(item)?))
}

async fn update_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Item>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let id = item_id(path)?;
    let Json(item) = payload?;
    Ok(Json(state.items.update(id, item)?))
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn delete_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    state.items.delete(item_id(path)?)?;
    Ok(Json(MessageResponse {
        message: "Item deleted successfully",
    }))
}

/// Relay the client's view of the link. Failures become an error-shaped body,
/// never an HTTP error.
async fn client_status(State(state): State<AppState>) -> Json<Value> {
    let url = join_url(&state.config.client_url, endpoints::COMMUNICATION_STATUS);
    match probe(&state.http, &url, state.config.status_timeout).await {
        Ok(body) => Json(body),
        Err(error) => {
            tracing::warn!(reason = error.reason(), %error, "Client status check failed");
            Json(json!({
                "status": "error",
                "message": format!("Failed to get client status: {error}"),
                "reason": error.reason(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use medialab_core::{Notification, NotificationType};
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    use super::*;

    async fn unused_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    async fn test_app(client_url: String) -> (Router, mpsc::Receiver<Notification>) {
        let config = Arc::new(ServerConfig {
            client_url,
            ..ServerConfig::default()
        });
        let (queue, receiver) = NotificationQueue::channel("test", 16);
        let items = ItemService::new(Arc::new(InMemoryItemRepository::new()), queue);
        (app_router(AppState::new(config, items)), receiver)
    }

    async fn request(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn camera_mic_scenario_over_http() {
        let (app, _receiver) = test_app(unused_url().await).await;

        let (status, camera) =
            request(&app, Method::POST, "/items", Some(json!({"name": "Camera"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(camera["id"], 1);
        assert_eq!(camera["name"], "Camera");
        assert_eq!(camera["description"], Value::Null);

        let (_, mic) = request(&app, Method::POST, "/items", Some(json!({"name": "Mic"}))).await;
        assert_eq!(mic["id"], 2);

        let (status, body) = request(&app, Method::DELETE, "/items/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Item deleted successfully"}));

        let (status, body) = request(&app, Method::GET, "/items/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Item not found");
        assert_eq!(body["error"]["status_code"], 404);

        let (status, items) = request(&app, Method::GET, "/items", None).await;
        assert_eq!(status, StatusCode::OK);
        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], 2);
        assert_eq!(items[0]["name"], "Mic");
    }

    #[tokio::test]
    async fn update_overwrites_body_id_with_path_id() {
        let (app, _receiver) = test_app(unused_url().await).await;
        request(&app, Method::POST, "/items", Some(json!({"name": "Camera"}))).await;

        let (status, body) = request(
            &app,
            Method::PUT,
            "/items/1",
            Some(json!({"id": 77, "name": "Camera II", "description": "mirrorless"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Camera II");
        assert_eq!(body["description"], "mirrorless");
    }

    #[tokio::test]
    async fn missing_item_mutations_return_404() {
        let (app, mut receiver) = test_app(unused_url().await).await;

        let (status, _) =
            request(&app, Method::PUT, "/items/3", Some(json!({"name": "Ghost"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = request(&app, Method::DELETE, "/items/3", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_and_negative_ids_use_error_envelope() {
        let (app, _receiver) = test_app(unused_url().await).await;

        let (status, body) = request(&app, Method::GET, "/items/abc", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["status_code"], 422);

        let (status, body) =
            request(&app, Method::PUT, "/items/abc", Some(json!({"name": "Camera"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["status_code"], 422);

        let (status, body) = request(&app, Method::DELETE, "/items/-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Item not found");
        assert_eq!(body["error"]["details"]["item_id"], -1);
    }

    #[tokio::test]
    async fn invalid_bodies_return_422() {
        let (app, _receiver) = test_app(unused_url().await).await;

        let (status, body) = request(&app, Method::POST, "/items", Some(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["status_code"], 422);

        let (status, _) =
            request(&app, Method::POST, "/items", Some(json!({"description": "no name"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn mutations_enqueue_server_notifications() {
        let (app, mut receiver) = test_app(unused_url().await).await;
        request(&app, Method::POST, "/items", Some(json!({"name": "Camera"}))).await;
        request(&app, Method::PUT, "/items/1", Some(json!({"name": "Camera II"}))).await;
        request(&app, Method::DELETE, "/items/1", None).await;

        let kinds: Vec<_> = [
            receiver.recv().await.unwrap(),
            receiver.recv().await.unwrap(),
            receiver.recv().await.unwrap(),
        ]
        .iter()
        .map(|notification| notification.kind)
        .collect();
        assert_eq!(
            kinds,
            vec![
                NotificationType::ServerItemCreated,
                NotificationType::ServerItemUpdated,
                NotificationType::ServerItemDeleted,
            ]
        );
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn client_status_degrades_when_client_is_down() {
        let (app, _receiver) = test_app(unused_url().await).await;

        let (status, body) = request(&app, Method::GET, "/client-status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["reason"], "connection_refused");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to get client status"));
    }

    #[tokio::test]
    async fn root_and_status_describe_the_server() {
        let (app, _receiver) = test_app(unused_url().await).await;

        let (status, body) = request(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], API_VERSION);

        request(&app, Method::POST, "/items", Some(json!({"name": "Camera"}))).await;
        let (status, body) = request(&app, Method::GET, "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["details"]["items_count"], 1);
        assert_eq!(body["details"]["client"]["status"], "disconnected");
    }
}
