//! medialab-core - Shared library for the MediaLab services
//!
//! This crate contains the canonical models, constants, error envelope and the
//! cross-service plumbing (notification relay, inbox log, health probes) used by
//! both the item server and the client.

pub mod config;
pub mod constants;
pub mod error;
pub mod health;
pub mod models;
pub mod relay;
pub mod util;

pub use error::{Error, ErrorEnvelope, Result, UpstreamError, ValidationError};
pub use models::{
    Item, ItemAction, Notification, NotificationData, NotificationType, Origin, PeerStatus,
    ServiceStatus, StatusResponse,
};
