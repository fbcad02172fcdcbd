//! Recording notifier for unit tests

use std::sync::Mutex;

use async_trait::async_trait;

use super::notifications::{ChannelConfig, NotificationContent, Notifier, Permission};
use crate::error::{NotifyError, NotifyResult};

/// Notifier that records every call instead of delivering anything
#[derive(Debug)]
pub struct RecordingNotifier {
    permission: Mutex<Permission>,
    /// Titles whose scheduling should fail
    failing_titles: Mutex<Vec<String>>,
    pub scheduled: Mutex<Vec<(i64, NotificationContent)>>,
    pub permission_requests: Mutex<usize>,
    pub cancel_calls: Mutex<usize>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(Permission::Granted),
            failing_titles: Mutex::new(Vec::new()),
            scheduled: Mutex::new(Vec::new()),
            permission_requests: Mutex::new(0),
            cancel_calls: Mutex::new(0),
        }
    }

    pub fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap() = permission;
    }

    pub fn fail_title(&self, title: &str) {
        self.failing_titles.lock().unwrap().push(title.to_string());
    }

    pub fn scheduled(&self) -> Vec<(i64, NotificationContent)> {
        self.scheduled.lock().unwrap().clone()
    }

    pub fn cancel_calls(&self) -> usize {
        *self.cancel_calls.lock().unwrap()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn request_permission(&self) -> Permission {
        *self.permission_requests.lock().unwrap() += 1;
        *self.permission.lock().unwrap()
    }

    async fn create_channel(&self, config: ChannelConfig) -> NotifyResult<String> {
        Ok(config.id)
    }

    async fn schedule_at(&self, timestamp_millis: i64, content: NotificationContent) -> NotifyResult<()> {
        if self.failing_titles.lock().unwrap().contains(&content.title) {
            return Err(NotifyError::Unavailable(format!("refusing '{}'", content.title)));
        }
        self.scheduled.lock().unwrap().push((timestamp_millis, content));
        Ok(())
    }

    async fn cancel_all(&self) -> NotifyResult<()> {
        *self.cancel_calls.lock().unwrap() += 1;
        self.scheduled.lock().unwrap().clear();
        Ok(())
    }
}
