//! Data models shared by the MediaLab services

mod item;
mod notification;
mod status;

pub use item::Item;
pub use notification::{ItemAction, Notification, NotificationData, NotificationType, Origin};
pub use status::{PeerStatus, ServiceStatus, StatusResponse};
