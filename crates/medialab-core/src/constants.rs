//! Constants shared by the server and the client.

/// Default port of the item server.
pub const SERVER_PORT: u16 = 4800;
/// Default bind host of the item server.
pub const SERVER_HOST: &str = "0.0.0.0";
/// Default URL the client uses to reach the server.
pub const SERVER_URL: &str = "http://localhost:4800";

/// Default port of the client service.
pub const CLIENT_PORT: u16 = 4810;
/// Default bind host of the client service.
pub const CLIENT_HOST: &str = "0.0.0.0";
/// Default URL the server uses to reach the client.
pub const CLIENT_URL: &str = "http://localhost:4810";

pub const API_VERSION: &str = "1.0.0";

/// Route paths. `{id}` segments follow axum's path syntax.
pub mod endpoints {
    pub const ROOT: &str = "/";
    pub const STATUS: &str = "/status";
    pub const ITEMS: &str = "/items";
    pub const ITEM: &str = "/items/{id}";

    // Server only
    pub const CLIENT_STATUS: &str = "/client-status";

    // Client only
    pub const NOTIFICATIONS: &str = "/notifications";
    pub const SERVER_COMMUNICATION: &str = "/server-communication";
    pub const NOTIFY: &str = "/server-communication/notify";
    pub const COMMUNICATION_STATUS: &str = "/server-communication/status";
}

/// Values for [`crate::Notification::source`].
pub mod sources {
    pub const SERVER: &str = "server";
    pub const CLIENT: &str = "client";
}

pub mod error_messages {
    pub const ITEM_NOT_FOUND: &str = "Item not found";
    pub const SERVER_NOT_AVAILABLE: &str = "Server is not available";
    pub const INVALID_REQUEST: &str = "Invalid request";
}

/// Fill a path template such as [`endpoints::ITEM`] with an item id.
pub fn item_path(id: u64) -> String {
    endpoints::ITEM.replace("{id}", &id.to_string())
}
