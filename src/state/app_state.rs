//! Main application state: the single coordinator for steaks and the countdown

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{debug, error, info, warn};

use super::{
    countdown::{seconds_until, Countdown, TickOutcome},
    preferences,
    SavedSteaks, SessionSnapshot, SteakCollection, TimerState,
};
use crate::{
    cooking::{CookTimeTable, SavedSteak, Steak, SteakInput},
    error::{GrillError, GrillResult},
    schedule::{plan_session, SchedulePlan},
    services::{ChannelConfig, KeyValueStore, NotificationContent, Notifier, Permission},
};

/// A message for the user that outlives the request that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn unexpected_close() -> Self {
        Self {
            title: "Unexpected Close".to_string(),
            message: "The app closed unexpectedly, if it's on us, we hope your steaks still turned out great and apologize for the inconvenience.".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// What `recover` found on startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// No persisted session
    Idle,
    /// Countdown resumed with this many seconds left
    Resumed { remaining_seconds: u64 },
    /// The persisted session ended while the process was down
    Expired,
}

/// Steaks and countdown, always mutated together under one lock
#[derive(Debug)]
struct CookSession {
    steaks: SteakCollection,
    countdown: Countdown,
}

impl CookSession {
    fn timer_state(&self) -> TimerState {
        self.countdown.timer_state(self.steaks.target_duration())
    }

    fn ensure_editable(&self) -> GrillResult<()> {
        if self.countdown.is_running() {
            warn!("Rejected steak edit while a cook session is running");
            return Err(GrillError::SessionRunning);
        }
        Ok(())
    }
}

/// Owns the steak collection, the countdown and the collaborators they use.
/// Every operation holds the session lock for its whole duration, storage and
/// notification I/O included, so a tick never observes a half-applied change.
pub struct AppState {
    session: AsyncMutex<CookSession>,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    pub saved_steaks: SavedSteaks,
    /// Notices waiting for the user to dismiss them
    notices: Mutex<Vec<Notice>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        table: Arc<CookTimeTable>,
        host: String,
        port: u16,
    ) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerState::default());

        Self {
            session: AsyncMutex::new(CookSession {
                steaks: SteakCollection::new(table),
                countdown: Countdown::new(),
            }),
            saved_steaks: SavedSteaks::new(Arc::clone(&store)),
            store,
            notifier,
            notices: Mutex::new(Vec::new()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    // Steak collection

    pub async fn list_steaks(&self) -> Vec<Steak> {
        self.session.lock().await.steaks.list().to_vec()
    }

    pub async fn add_steak(&self, input: SteakInput) -> GrillResult<Steak> {
        let mut session = self.session.lock().await;
        session.ensure_editable()?;
        let steak = session.steaks.add(input)?;
        self.publish(session.timer_state());
        self.record_action("add-steak");
        Ok(steak)
    }

    /// `Ok(None)` when nothing sits at `index` any more
    pub async fn edit_steak(&self, index: usize, input: SteakInput) -> GrillResult<Option<Steak>> {
        let mut session = self.session.lock().await;
        session.ensure_editable()?;
        let edited = session.steaks.edit(index, input)?;
        if edited.is_some() {
            self.publish(session.timer_state());
            self.record_action("edit-steak");
        }
        Ok(edited)
    }

    /// `Ok(None)` when nothing sits at `index` any more
    pub async fn remove_steak(&self, index: usize) -> GrillResult<Option<Steak>> {
        let mut session = self.session.lock().await;
        session.ensure_editable()?;
        let removed = session.steaks.remove(index);
        if removed.is_some() {
            self.publish(session.timer_state());
            self.record_action("remove-steak");
        }
        Ok(removed)
    }

    /// Put a saved steak on the list, with cook times looked up fresh
    pub async fn cook_saved_steak(&self, id: u64) -> GrillResult<Steak> {
        let saved: SavedSteak = self
            .saved_steaks
            .get(id)?
            .ok_or(GrillError::SavedSteakNotFound(id))?;
        let steak = self.add_steak(saved.to_steak_input()).await?;
        info!("Saved steak {} added to the grill list", id);
        Ok(steak)
    }

    /// Target duration and groupings for the current steaks
    pub async fn schedule_plan(&self) -> SchedulePlan {
        plan_session(self.session.lock().await.steaks.list())
    }

    // Countdown

    pub async fn start_session(&self) -> GrillResult<TimerState> {
        self.start_session_at(Utc::now()).await
    }

    /// Idle -> Running. Fails without touching any state when a session is
    /// already running, there are no steaks, or notification permission is
    /// denied.
    pub async fn start_session_at(&self, now: DateTime<Utc>) -> GrillResult<TimerState> {
        let mut session = self.session.lock().await;
        if session.countdown.is_running() {
            return Err(GrillError::AlreadyRunning);
        }
        if session.steaks.is_empty() {
            warn!("Start requested with no steaks");
            return Err(GrillError::EmptyCollection);
        }
        if self.notifier.request_permission().await == Permission::Denied {
            warn!("Notification permission denied, cook session not started");
            return Err(GrillError::PermissionDenied);
        }

        let plan = plan_session(session.steaks.list());
        let end_time = Countdown::end_time_for(now, plan.target_seconds);

        let snapshot = SessionSnapshot::new(session.steaks.list().to_vec(), end_time, plan.target_seconds);
        if let Err(e) = snapshot.save(self.store.as_ref()) {
            // The session still runs; it just can't be recovered after a restart
            error!("Failed to persist session snapshot: {}", e);
        }

        let scheduled = self.dispatch_notifications(&plan, now).await;
        session.countdown.begin(now, plan.target_seconds);
        info!(
            "Cook session started: {} steaks, {}s, {} notifications scheduled",
            session.steaks.len(),
            plan.target_seconds,
            scheduled
        );

        let timer = session.timer_state();
        self.publish(timer.clone());
        self.record_action("start");
        Ok(timer)
    }

    /// Hand every planned notification to the notifier. One failure does not
    /// stop the rest. Returns how many were scheduled.
    async fn dispatch_notifications(&self, plan: &SchedulePlan, now: DateTime<Utc>) -> usize {
        let channel_id = match self.notifier.create_channel(ChannelConfig::steak_timer()).await {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to create notification channel: {}", e);
                return 0;
            }
        };

        let start_millis = now.timestamp_millis();
        let mut scheduled = 0;
        for planned in &plan.notifications {
            let content = NotificationContent {
                title: planned.title.clone(),
                body: planned.body.clone(),
                channel_id: channel_id.clone(),
            };
            let at = start_millis + planned.fire_after_seconds as i64 * 1000;
            match self.notifier.schedule_at(at, content).await {
                Ok(()) => scheduled += 1,
                Err(e) => error!("Failed to schedule '{}' at +{}s: {}", planned.title, planned.fire_after_seconds, e),
            }
        }
        scheduled
    }

    pub async fn tick(&self) -> TimerState {
        self.tick_at(Utc::now()).await
    }

    /// Advance the countdown. Clears the snapshot on the tick that expires it.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> TimerState {
        let mut session = self.session.lock().await;
        match session.countdown.tick(now) {
            TickOutcome::Idle => return session.timer_state(),
            TickOutcome::Running { .. } => {}
            TickOutcome::Expired => {
                if let Err(e) = SessionSnapshot::clear(self.store.as_ref()) {
                    error!("Failed to clear session snapshot: {}", e);
                }
                info!("Cook session complete, steaks are done");
                self.record_action("complete");
            }
        }

        let timer = session.timer_state();
        self.publish(timer.clone());
        timer
    }

    /// Running -> Idle on user request. Cancels every pending notification.
    pub async fn stop_session(&self) -> GrillResult<TimerState> {
        let mut session = self.session.lock().await;
        if !session.countdown.is_running() {
            return Err(GrillError::NotRunning);
        }

        if let Err(e) = self.notifier.cancel_all().await {
            error!("Failed to cancel notifications: {}", e);
        }
        if let Err(e) = SessionSnapshot::clear(self.store.as_ref()) {
            error!("Failed to clear session snapshot: {}", e);
        }
        session.countdown.halt();
        info!("Cook session stopped");

        let timer = session.timer_state();
        self.publish(timer.clone());
        self.record_action("stop");
        Ok(timer)
    }

    pub async fn recover(&self) -> RecoveryOutcome {
        self.recover_at(Utc::now()).await
    }

    /// Reconcile a persisted session against the clock. Runs once at startup.
    /// Notifications are not rescheduled here: they were tied to absolute
    /// times when the session started and the notifier keeps them itself.
    pub async fn recover_at(&self, now: DateTime<Utc>) -> RecoveryOutcome {
        let mut session = self.session.lock().await;
        if session.countdown.is_running() {
            debug!("Recovery skipped, countdown already running");
            return RecoveryOutcome::Resumed {
                remaining_seconds: session.countdown.remaining_seconds(),
            };
        }

        let Some(snapshot) = SessionSnapshot::load(self.store.as_ref()) else {
            debug!("No persisted cook session");
            return RecoveryOutcome::Idle;
        };

        if seconds_until(snapshot.end_time, now) <= 0 {
            if let Err(e) = SessionSnapshot::clear(self.store.as_ref()) {
                error!("Failed to clear stale session snapshot: {}", e);
            }
            self.add_notice(Notice::unexpected_close());
            return RecoveryOutcome::Expired;
        }

        session.steaks.replace_all(snapshot.steaks);
        let target = session.steaks.target_duration();
        session.countdown.resume(snapshot.end_time, target, now);

        let timer = session.timer_state();
        self.publish(timer.clone());
        self.record_action("recover");
        RecoveryOutcome::Resumed {
            remaining_seconds: timer.remaining_seconds.unwrap_or(0),
        }
    }

    // Views

    /// Latest published timer state
    pub fn timer_state(&self) -> TimerState {
        self.timer_update_tx.borrow().clone()
    }

    pub fn subscribe_timer(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    fn publish(&self, timer: TimerState) {
        // send_replace never fails, even with no subscribers
        self.timer_update_tx.send_replace(timer);
    }

    pub fn add_notice(&self, notice: Notice) {
        warn!("{}: {}", notice.title, notice.message);
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(e) => error!("Failed to lock notices: {}", e),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    /// Dismiss all notices, returning how many there were
    pub fn clear_notices(&self) -> usize {
        self.notices
            .lock()
            .map(|mut n| n.drain(..).count())
            .unwrap_or(0)
    }

    pub fn skip_intro(&self) -> bool {
        preferences::skip_intro(self.store.as_ref())
    }

    pub fn set_skip_intro(&self, skip: bool) -> GrillResult<()> {
        preferences::set_skip_intro(self.store.as_ref(), skip)?;
        self.record_action(if skip { "skip-intro" } else { "show-intro" });
        Ok(())
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
