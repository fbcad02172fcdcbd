//! State management module
//!
//! This module contains the steak collection, the countdown engine, the
//! persisted session snapshot and the coordinator that ties them together.

pub mod app_state;
pub mod countdown;
pub mod preferences;
pub mod saved_steaks;
pub mod snapshot;
pub mod steak_collection;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, Notice, RecoveryOutcome};
pub use countdown::{Countdown, TickOutcome};
pub use saved_steaks::SavedSteaks;
pub use snapshot::SessionSnapshot;
pub use steak_collection::SteakCollection;
pub use timer_state::{format_clock, TimerState};
