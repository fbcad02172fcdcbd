//! External collaborators: durable storage and notification delivery
//!
//! The core only talks to these through the `KeyValueStore` and `Notifier`
//! traits.

pub mod notifications;
pub mod storage;

#[cfg(test)]
pub mod mock;

// Re-export main types
pub use notifications::{
    ChannelConfig, LocalNotifier, NotificationContent, Notifier, Permission, ScheduledNotification,
};
pub use storage::{keys, FileStore, KeyValueStore, MemoryStore};
