//! Synchronization scheduler
//!
//! Computes the session target and the place/flip groupings that make every
//! steak finish at the same moment.

pub mod grouping;
pub mod plan;

pub use grouping::{action_offset, group_steaks, target_duration, SteakAction, SteakGroup};
pub use plan::{plan_session, PlannedNotification, SchedulePlan};
