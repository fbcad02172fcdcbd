//! Timer state as seen by subscribers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the countdown, published on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub active: bool,
    pub remaining_seconds: Option<u64>,
    /// Session length: the frozen target while running, otherwise the
    /// target of the current collection
    pub target_seconds: u64,
    pub end_time: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create an inactive timer state
    pub fn inactive(target_seconds: u64) -> Self {
        Self {
            active: false,
            remaining_seconds: None,
            target_seconds,
            end_time: None,
        }
    }

    /// Create an active timer state with remaining seconds
    pub fn active(remaining_seconds: u64, target_seconds: u64, end_time: DateTime<Utc>) -> Self {
        Self {
            active: true,
            remaining_seconds: Some(remaining_seconds),
            target_seconds,
            end_time: Some(end_time),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds to show on the clock: time left while counting down,
    /// the full session length otherwise
    pub fn display_seconds(&self) -> u64 {
        match self.remaining_seconds {
            Some(remaining) if self.active && remaining > 0 => remaining,
            _ => self.target_seconds,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::inactive(0)
    }
}

/// Format seconds as `m:ss`, or `h:mm:ss` past an hour
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
