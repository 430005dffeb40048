//! medialab-client - Item proxy and notification inbox for MediaLab
//!
//! Forwards item CRUD to the server, keeps its own log of what it did, and
//! accepts the notifications the server relays after each mutation.

pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;
pub mod service;


pub use config::ClientConfig;
pub use routes::{app_router, AppState};
