//! Startup recovery of a cook session interrupted by a restart

use std::sync::Arc;
use tracing::info;

use crate::state::{AppState, RecoveryOutcome};

/// Reconcile any persisted cook session with the wall clock. Must run before
/// the countdown task starts ticking.
pub async fn recover_session(state: Arc<AppState>) -> RecoveryOutcome {
    info!("Checking for an interrupted cook session");

    let outcome = state.recover().await;
    match outcome {
        RecoveryOutcome::Idle => info!("No cook session to recover"),
        RecoveryOutcome::Resumed { remaining_seconds } => info!(
            "Recovered cook session with {}s remaining; scheduled notifications were left in place",
            remaining_seconds
        ),
        RecoveryOutcome::Expired => info!("Interrupted cook session already ended, snapshot cleared"),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cooking::{CookTimeTable, Doneness, Steak, SteakInput, Thickness},
        services::{keys, mock::RecordingNotifier, KeyValueStore, LocalNotifier, MemoryStore, Permission},
        state::SessionSnapshot,
    };
    use chrono::{Duration, Utc};

    fn state_over(store: Arc<MemoryStore>) -> Arc<AppState> {
        Arc::new(AppState::new(
            store,
            Arc::new(RecordingNotifier::new()),
            Arc::new(CookTimeTable::builtin()),
            "127.0.0.1".to_string(),
            0,
        ))
    }

    #[tokio::test]
    async fn resumes_a_live_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let steak = Steak {
            person_name: "Ana".into(),
            desired_doneness: Doneness::Medium,
            thickness: Thickness::One,
            first_side_time: 360,
            second_side_time: 300,
        };
        SessionSnapshot::new(vec![steak], Utc::now() + Duration::seconds(120), 660)
            .save(store.as_ref())
            .unwrap();

        let state = state_over(store);
        let outcome = recover_session(Arc::clone(&state)).await;
        assert!(matches!(outcome, RecoveryOutcome::Resumed { remaining_seconds } if remaining_seconds <= 120 && remaining_seconds >= 118));
        assert!(state.timer_state().is_active());
        assert_eq!(state.timer_state().target_seconds, 660);
    }

    #[tokio::test]
    async fn nothing_to_recover() {
        let state = state_over(Arc::new(MemoryStore::new()));
        assert_eq!(recover_session(state).await, RecoveryOutcome::Idle);
    }

    #[tokio::test]
    async fn restart_keeps_upcoming_notifications() {
        let store = Arc::new(MemoryStore::new());
        let table = Arc::new(CookTimeTable::builtin());

        let notifier = Arc::new(LocalNotifier::restore(Permission::Granted, store.clone()));
        let state = AppState::new(
            store.clone(),
            notifier.clone(),
            Arc::clone(&table),
            "127.0.0.1".to_string(),
            0,
        );
        state
            .add_steak(SteakInput::new("Ana", Doneness::Rare, Thickness::One))
            .await
            .unwrap();
        state
            .add_steak(SteakInput::new("Bo", Doneness::WellDone, Thickness::Two))
            .await
            .unwrap();
        state.start_session().await.unwrap();
        // Bo's placement is due immediately; four more are still ahead
        let persisted = store.get(keys::PENDING_NOTIFICATIONS).unwrap().unwrap();
        let persisted: Vec<serde_json::Value> = serde_json::from_str(&persisted).unwrap();
        assert_eq!(persisted.len(), 4);
        drop(state);
        drop(notifier);

        let notifier = Arc::new(LocalNotifier::restore(Permission::Granted, store.clone()));
        let state = Arc::new(AppState::new(
            store,
            notifier.clone(),
            table,
            "127.0.0.1".to_string(),
            0,
        ));
        let outcome = recover_session(Arc::clone(&state)).await;

        assert!(matches!(outcome, RecoveryOutcome::Resumed { .. }));
        assert!(state.timer_state().is_active());
        assert_eq!(notifier.pending_count(), 4);

        state.stop_session().await.unwrap();
        assert_eq!(notifier.pending_count(), 0);
    }
}
