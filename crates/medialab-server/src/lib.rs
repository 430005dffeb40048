//! medialab-server - Item server for MediaLab
//!
//! Holds the in-memory item collection and pushes a notification to the
//! client's inbox after every successful mutation.

pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod store;

pub use config::ServerConfig;
pub use routes::{app_router, AppState};
