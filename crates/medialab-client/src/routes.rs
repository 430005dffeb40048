use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use medialab_core::constants::{endpoints, API_VERSION};
use medialab_core::health::check_service_status;
use medialab_core::relay::{DeferredProcessing, NotificationLog, NotificationQueue};
use medialab_core::{Item, Notification, StatusResponse};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ClientConfig;
use crate::error::AppError;
use crate::proxy::ItemProxy;
use crate::service::{ClientService, CommunicationStatus};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
    client: ClientService,
    http: reqwest::Client,
}

impl AppState {
    /// Wire the proxy, the inbox log and its deferred processing worker.
    pub fn from_config(config: Arc<ClientConfig>) -> Self {
        let http = reqwest::Client::new();
        let proxy = ItemProxy::new(
            http.clone(),
            config.server_url.clone(),
            config.request_timeout,
        );
        let processing = NotificationQueue::spawn(
            "inbox-processing",
            DeferredProcessing::new(config.processing_delay),
            config.notify_queue_capacity,
        );
        let client = ClientService::new(
            proxy,
            Arc::new(NotificationLog::new()),
            processing,
            config.status_timeout,
        );
        Self::new(config, client)
    }

    pub fn new(config: Arc<ClientConfig>, client: ClientService) -> Self {
        Self {
            config,
            client,
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
        .route(
            endpoints::NOTIFICATIONS,
            get(list_notifications).delete(clear_notifications),
        )
        .route(endpoints::NOTIFY, post(receive_notification))
        .route(endpoints::COMMUNICATION_STATUS, get(communication_status))
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
    server_url: String,
    endpoints: BTreeMap<&'static str, &'static str>,
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("items", endpoints::ITEMS),
        ("notifications", endpoints::NOTIFICATIONS),
        ("server_communication", endpoints::SERVER_COMMUNICATION),
        ("status", endpoints::STATUS),
    ]);
    Json(RootResponse {
        message: "Welcome to MediaLab Client",
        version: API_VERSION,
        server_url: state.config.server_url.clone(),
        endpoints,
    })
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let server = check_service_status(
        &state.http,
        &state.config.server_url,
        state.config.status_timeout,
    )
    .await;
    Json(StatusResponse::running().with_details(json!({
        "notifications_count": state.client.notifications_count(),
        "dropped_notifications": state.client.dropped_notifications(),
        "server": server,
    })))
}

async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(state.client.list_items().await?))
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
    Ok(Json(state.client.get_item(item_id(path)?).await?))
}

async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<Item>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Json(item) = payload?;
    Ok(Json(state.client.create_item(item).await?))
}

async fn update_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Item>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let id = item_id(path)?;
    let Json(item) = payload?;
    Ok(Json(state.client.update_item(id, item).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.client.delete_item(item_id(path)?).await?))
}

async fn list_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.client.notifications())
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn clear_notifications(State(state): State<AppState>) -> Json<MessageResponse> {
    state.client.clear_notifications();
    Json(MessageResponse {
        message: "All notifications cleared",
    })
}

async fn receive_notification(
    State(state): State<AppState>,
    payload: Result<Json<Notification>, JsonRejection>,
) -> Result<Json<Notification>, AppError> {
    let Json(notification) = payload?;
    Ok(Json(state.client.receive(notification)?))
}

async fn communication_status(State(state): State<AppState>) -> Json<CommunicationStatus> {
    Json(state.client.communication_status().await)
}
