//! Countdown timer background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that ticks the countdown once per second while a cook
/// session is running, and sleeps on timer updates otherwise
pub async fn countdown_timer_task(state: Arc<AppState>) {
    info!("Starting countdown timer task");

    let mut timer_rx = state.subscribe_timer();

    loop {
        // Wait until a session is running
        if !timer_rx.borrow_and_update().is_active() {
            if timer_rx.changed().await.is_err() {
                debug!("Timer channel closed, countdown task exiting");
                return;
            }
            continue;
        }

        info!("Cook session running, countdown ticking");
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let timer = state.tick().await;
                    if !timer.is_active() {
                        info!("Countdown finished");
                        break;
                    }
                }

                // A stop arrives as an inactive timer update
                changed = timer_rx.changed() => {
                    if changed.is_err() {
                        debug!("Timer channel closed, countdown task exiting");
                        return;
                    }
                    if !timer_rx.borrow().is_active() {
                        debug!("Countdown stopped, waiting for the next session");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cooking::{CookTimeEntry, CookTimeTable, Doneness, SteakInput, Thickness},
        services::{mock::RecordingNotifier, MemoryStore},
    };

    fn quick_state() -> Arc<AppState> {
        let table = CookTimeTable::from_entries(vec![CookTimeEntry {
            doneness: Doneness::Rare,
            thickness: Thickness::Half,
            first_side: 1,
            second_side: 1,
        }]);
        Arc::new(AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::new()),
            Arc::new(table),
            "127.0.0.1".to_string(),
            0,
        ))
    }

    #[tokio::test]
    async fn ticks_a_session_to_completion() {
        let state = quick_state();
        state
            .add_steak(SteakInput::new("Ana", Doneness::Rare, Thickness::Half))
            .await
            .unwrap();
        tokio::spawn(countdown_timer_task(Arc::clone(&state)));

        let mut rx = state.subscribe_timer();
        state.start_session().await.unwrap();

        let finished = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                rx.changed().await.unwrap();
                if !rx.borrow_and_update().is_active() {
                    break;
                }
            }
        })
        .await;
        assert!(finished.is_ok());
        assert_eq!(state.get_last_action().0.as_deref(), Some("complete"));
    }

    #[tokio::test]
    async fn stop_ends_the_ticking_loop() {
        let state = quick_state();
        state
            .add_steak(SteakInput::new("Ana", Doneness::Rare, Thickness::Half))
            .await
            .unwrap();
        let task = tokio::spawn(countdown_timer_task(Arc::clone(&state)));

        state.start_session().await.unwrap();
        state.stop_session().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!state.timer_state().is_active());
        assert!(!task.is_finished());
        task.abort();
    }
}
