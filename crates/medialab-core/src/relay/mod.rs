//! Notification relay between the two services.
//!
//! Delivery is fire-and-forget and at-most-once: a notification is handed to a
//! bounded [`NotificationQueue`], a detached worker pushes it to the peer's
//! inbox once, and failures are logged and dropped. The receiving side appends
//! it to its [`NotificationLog`].

mod deliver;
mod inbox;
mod queue;

pub use deliver::{NotificationRelay, DEFAULT_RELAY_TIMEOUT};
pub use inbox::NotificationLog;
pub use queue::{
    DeferredProcessing, NotificationHandler, NotificationQueue, RelayDelivery,
    DEFAULT_QUEUE_CAPACITY,
};
