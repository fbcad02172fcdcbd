//! Countdown engine
//!
//! Holds the authoritative end timestamp of the one active cook session.
//! Wall-clock time is always passed in, so every transition is deterministic
//! for a given `now`. Persistence and notifications live in the coordinator
//! (`AppState`); this type only decides state.
//!
//! States: Idle (no end time) and Running (end time set). Expiry and stop are
//! transient and collapse straight back to Idle.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::TimerState;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing running
    Idle,
    Running { remaining_seconds: u64 },
    /// This tick reached zero; the countdown is Idle again
    Expired,
}

#[derive(Debug, Clone, Default)]
pub struct Countdown {
    end_time: Option<DateTime<Utc>>,
    target_seconds: u64,
    remaining_seconds: u64,
}

/// Whole seconds from `now` until `end_time`, floored. Negative once past.
pub fn seconds_until(end_time: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (end_time - now).num_milliseconds().div_euclid(1000)
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// End timestamp a session started at `now` would have
    pub fn end_time_for(now: DateTime<Utc>, target_seconds: u64) -> DateTime<Utc> {
        now + Duration::seconds(target_seconds as i64)
    }

    /// Idle -> Running. Caller guarantees the countdown is Idle.
    pub fn begin(&mut self, now: DateTime<Utc>, target_seconds: u64) -> DateTime<Utc> {
        let end_time = Self::end_time_for(now, target_seconds);
        self.end_time = Some(end_time);
        self.target_seconds = target_seconds;
        self.remaining_seconds = target_seconds;
        info!("Countdown started: {}s, ends at {}", target_seconds, end_time.to_rfc3339());
        end_time
    }

    /// Recompute remaining time. The first tick where it is <= 0 expires the
    /// countdown.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let Some(end_time) = self.end_time else {
            return TickOutcome::Idle;
        };

        let remaining = seconds_until(end_time, now);
        if remaining <= 0 {
            info!("Countdown reached zero");
            self.reset();
            TickOutcome::Expired
        } else {
            self.remaining_seconds = remaining as u64;
            debug!("Countdown tick: {}s remaining", remaining);
            TickOutcome::Running {
                remaining_seconds: self.remaining_seconds,
            }
        }
    }

    /// Running -> Idle on user request
    pub fn halt(&mut self) {
        if let Some(end_time) = self.end_time {
            info!("Countdown stopped (was due at {})", end_time.to_rfc3339());
        }
        self.reset();
    }

    /// Resume from a persisted end time. Returns false, leaving the countdown
    /// Idle, when that end time has already passed.
    pub fn resume(&mut self, end_time: DateTime<Utc>, target_seconds: u64, now: DateTime<Utc>) -> bool {
        let diff = seconds_until(end_time, now);
        if diff <= 0 {
            debug!("Persisted countdown ended {}s ago", -diff);
            self.reset();
            return false;
        }

        self.end_time = Some(end_time);
        self.target_seconds = target_seconds;
        self.remaining_seconds = diff as u64;
        info!("Countdown resumed with {}s remaining", diff);
        true
    }

    /// Timer state for subscribers. `idle_target` is shown when not running.
    pub fn timer_state(&self, idle_target: u64) -> TimerState {
        match self.end_time {
            Some(end_time) => TimerState::active(self.remaining_seconds, self.target_seconds, end_time),
            None => TimerState::inactive(idle_target),
        }
    }

    fn reset(&mut self) {
        self.end_time = None;
        self.target_seconds = 0;
        self.remaining_seconds = 0;
    }
}
