//! Notification service

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{sync::broadcast, task::JoinHandle, time::sleep};
use tracing::{debug, info, warn};

use super::storage::{keys, KeyValueStore};
use crate::error::{NotifyError, NotifyResult, StoreError};

/// Outcome of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
}

/// Delivery channel settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub sound: bool,
    pub vibration: bool,
}

impl ChannelConfig {
    pub fn steak_timer() -> Self {
        Self {
            id: "steak-timer".to_string(),
            name: "Steak Timer Notifications".to_string(),
            sound: true,
            vibration: true,
        }
    }
}

/// What a notification shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub channel_id: String,
}

/// Platform notification service. Scheduled notifications are tied to absolute
/// timestamps and keep firing even if the caller goes away.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn request_permission(&self) -> Permission;

    /// Create (or reuse) a channel and return its id
    async fn create_channel(&self, config: ChannelConfig) -> NotifyResult<String>;

    async fn schedule_at(&self, timestamp_millis: i64, content: NotificationContent) -> NotifyResult<()>;

    /// Cancel every pending notification, including ones already due
    async fn cancel_all(&self) -> NotifyResult<()>;
}

/// A notification waiting for its timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub timestamp_millis: i64,
    pub content: NotificationContent,
}

struct PendingNotification {
    scheduled: ScheduledNotification,
    handle: JoinHandle<()>,
}

/// Notifier backed by tokio timers in this process.
/// Each scheduled notification is a task that sleeps until its timestamp and
/// then announces it through the log and a broadcast channel. When built with
/// a store, the pending list is persisted under `pendingNotifications` and
/// re-armed by the next `restore`, so a restart does not lose them.
pub struct LocalNotifier {
    permission: Permission,
    channels: Mutex<HashSet<String>>,
    pending: Mutex<Vec<PendingNotification>>,
    store: Option<Arc<dyn KeyValueStore>>,
    delivered_tx: broadcast::Sender<NotificationContent>,
}

impl LocalNotifier {
    /// Notifier whose pending notifications live only as long as the process
    pub fn new(permission: Permission) -> Self {
        Self::build(permission, None)
    }

    /// Notifier that persists pending notifications to `store`. Anything left
    /// there by a previous run is re-armed if it is still in the future; what
    /// came due while the process was down is dropped.
    /// Must be called from within a tokio runtime.
    pub fn restore(permission: Permission, store: Arc<dyn KeyValueStore>) -> Self {
        let saved = load_scheduled(store.as_ref());
        let notifier = Self::build(permission, Some(store));

        let now = Utc::now().timestamp_millis();
        let (future, past): (Vec<_>, Vec<_>) = saved
            .into_iter()
            .partition(|scheduled| scheduled.timestamp_millis > now);
        if !past.is_empty() {
            debug!("Dropping {} notifications that came due while stopped", past.len());
        }

        match (notifier.channels.lock(), notifier.pending.lock()) {
            (Ok(mut channels), Ok(mut pending)) => {
                for scheduled in future {
                    channels.insert(scheduled.content.channel_id.clone());
                    pending.push(notifier.arm(scheduled));
                }
                notifier.persist(&pending);
                if !pending.is_empty() {
                    info!("Re-armed {} pending notifications", pending.len());
                }
            }
            _ => warn!("Notifier state poisoned, pending notifications not restored"),
        }
        notifier
    }

    fn build(permission: Permission, store: Option<Arc<dyn KeyValueStore>>) -> Self {
        let (delivered_tx, _) = broadcast::channel(32);
        Self {
            permission,
            channels: Mutex::new(HashSet::new()),
            pending: Mutex::new(Vec::new()),
            store,
            delivered_tx,
        }
    }

    /// Receive notifications as they fire
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationContent> {
        self.delivered_tx.subscribe()
    }

    /// Number of notifications still waiting to fire
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .map(|mut pending| {
                pending.retain(|p| !p.handle.is_finished());
                pending.len()
            })
            .unwrap_or(0)
    }

    fn arm(&self, scheduled: ScheduledNotification) -> PendingNotification {
        let delay_ms = (scheduled.timestamp_millis - Utc::now().timestamp_millis()).max(0) as u64;
        let content = scheduled.content.clone();
        debug!("Scheduling '{}' in {}ms: {}", content.title, delay_ms, content.body);

        let delivered_tx = self.delivered_tx.clone();
        let handle = tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            info!("Notification: {} - {}", content.title, content.body);
            // Nobody listening is fine
            let _ = delivered_tx.send(content);
        });
        PendingNotification { scheduled, handle }
    }

    /// Write the not-yet-due part of `pending` to the store, or clear the key
    /// when nothing is left. Failures only cost durability, so they are logged.
    fn persist(&self, pending: &[PendingNotification]) {
        let Some(store) = &self.store else {
            return;
        };

        let now = Utc::now().timestamp_millis();
        let upcoming: Vec<&ScheduledNotification> = pending
            .iter()
            .map(|p| &p.scheduled)
            .filter(|scheduled| scheduled.timestamp_millis > now)
            .collect();

        let result = if upcoming.is_empty() {
            store.remove(keys::PENDING_NOTIFICATIONS)
        } else {
            serde_json::to_string(&upcoming)
                .map_err(StoreError::from)
                .and_then(|json| store.set(keys::PENDING_NOTIFICATIONS, &json))
        };
        if let Err(e) = result {
            warn!("Failed to persist pending notifications: {}", e);
        }
    }
}

fn load_scheduled(store: &dyn KeyValueStore) -> Vec<ScheduledNotification> {
    match store.get(keys::PENDING_NOTIFICATIONS) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable pending notifications: {}", e);
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to read pending notifications: {}", e);
            Vec::new()
        }
    }
}

#[async_trait]
impl Notifier for LocalNotifier {
    async fn request_permission(&self) -> Permission {
        debug!("Notification permission requested: {:?}", self.permission);
        self.permission
    }

    async fn create_channel(&self, config: ChannelConfig) -> NotifyResult<String> {
        let mut channels = self
            .channels
            .lock()
            .map_err(|e| NotifyError::Unavailable(format!("Failed to lock channels: {}", e)))?;
        if channels.insert(config.id.clone()) {
            debug!("Created notification channel '{}' ({})", config.id, config.name);
        }
        Ok(config.id)
    }

    async fn schedule_at(&self, timestamp_millis: i64, content: NotificationContent) -> NotifyResult<()> {
        let known = self
            .channels
            .lock()
            .map_err(|e| NotifyError::Unavailable(format!("Failed to lock channels: {}", e)))?
            .contains(&content.channel_id);
        if !known {
            return Err(NotifyError::UnknownChannel(content.channel_id));
        }

        let mut pending = self
            .pending
            .lock()
            .map_err(|e| NotifyError::Unavailable(format!("Failed to lock pending notifications: {}", e)))?;
        pending.retain(|p| !p.handle.is_finished());
        pending.push(self.arm(ScheduledNotification { timestamp_millis, content }));
        self.persist(&pending);
        Ok(())
    }

    async fn cancel_all(&self) -> NotifyResult<()> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| NotifyError::Unavailable(format!("Failed to lock pending notifications: {}", e)))?;

        let count = pending.iter().filter(|p| !p.handle.is_finished()).count();
        for p in pending.drain(..) {
            p.handle.abort();
        }
        self.persist(&pending);

        if count > 0 {
            info!("Cancelled {} pending notifications", count);
        } else {
            debug!("Cancel requested with no pending notifications");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryStore;

    fn content(title: &str, channel_id: &str) -> NotificationContent {
        NotificationContent {
            title: title.to_string(),
            body: "body".to_string(),
            channel_id: channel_id.to_string(),
        }
    }

    #[tokio::test]
    async fn delivers_due_notifications() {
        let notifier = LocalNotifier::new(Permission::Granted);
        let channel = notifier.create_channel(ChannelConfig::steak_timer()).await.unwrap();
        let mut rx = notifier.subscribe();

        notifier
            .schedule_at(Utc::now().timestamp_millis(), content("Flip Steaks", &channel))
            .await
            .unwrap();

        let delivered = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delivered.title, "Flip Steaks");
    }

    #[tokio::test]
    async fn cancel_all_drops_pending() {
        let notifier = LocalNotifier::new(Permission::Granted);
        let channel = notifier.create_channel(ChannelConfig::steak_timer()).await.unwrap();
        let later = Utc::now().timestamp_millis() + 60_000;

        notifier.schedule_at(later, content("Place Steaks", &channel)).await.unwrap();
        notifier.schedule_at(later, content("Steaks Ready", &channel)).await.unwrap();
        assert_eq!(notifier.pending_count(), 2);

        notifier.cancel_all().await.unwrap();
        assert_eq!(notifier.pending_count(), 0);
    }

    #[tokio::test]
    async fn restore_rearms_only_upcoming_notifications() {
        let store = Arc::new(MemoryStore::new());
        let notifier = LocalNotifier::restore(Permission::Granted, store.clone());
        let channel = notifier.create_channel(ChannelConfig::steak_timer()).await.unwrap();
        let now = Utc::now().timestamp_millis();

        notifier.schedule_at(now, content("Place Steaks", &channel)).await.unwrap();
        notifier.schedule_at(now + 60_000, content("Flip Steaks", &channel)).await.unwrap();
        notifier.schedule_at(now + 120_000, content("Steaks Ready", &channel)).await.unwrap();
        drop(notifier);

        let restored = LocalNotifier::restore(Permission::Granted, store.clone());
        assert_eq!(restored.pending_count(), 2);
        let persisted: Vec<ScheduledNotification> =
            serde_json::from_str(&store.get(keys::PENDING_NOTIFICATIONS).unwrap().unwrap()).unwrap();
        let titles: Vec<&str> = persisted.iter().map(|s| s.content.title.as_str()).collect();
        assert_eq!(titles, vec!["Flip Steaks", "Steaks Ready"]);

        // The restored channel is usable without being created again
        restored
            .schedule_at(now + 180_000, content("Flip Steaks", &channel))
            .await
            .unwrap();
        assert_eq!(restored.pending_count(), 3);

        restored.cancel_all().await.unwrap();
        assert_eq!(restored.pending_count(), 0);
        assert_eq!(store.get(keys::PENDING_NOTIFICATIONS).unwrap(), None);
    }

    #[tokio::test]
    async fn restore_drops_notifications_that_came_due() {
        let store = Arc::new(MemoryStore::new());
        let stale = vec![ScheduledNotification {
            timestamp_millis: Utc::now().timestamp_millis() - 1_000,
            content: content("Flip Steaks", "steak-timer"),
        }];
        store
            .set(keys::PENDING_NOTIFICATIONS, &serde_json::to_string(&stale).unwrap())
            .unwrap();

        let notifier = LocalNotifier::restore(Permission::Granted, store.clone());
        assert_eq!(notifier.pending_count(), 0);
        assert_eq!(store.get(keys::PENDING_NOTIFICATIONS).unwrap(), None);
    }

    #[tokio::test]
    async fn unreadable_pending_list_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::PENDING_NOTIFICATIONS, "not json").unwrap();
        let notifier = LocalNotifier::restore(Permission::Granted, store);
        assert_eq!(notifier.pending_count(), 0);
    }

    #[tokio::test]
    async fn unknown_channel_is_rejected() {
        let notifier = LocalNotifier::new(Permission::Granted);
        let err = notifier
            .schedule_at(0, content("Place Steaks", "missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::UnknownChannel(_)));
    }

    #[tokio::test]
    async fn reports_configured_permission() {
        let notifier = LocalNotifier::new(Permission::Denied);
        assert_eq!(notifier.request_permission().await, Permission::Denied);
    }
}
