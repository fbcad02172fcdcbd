//! Background tasks module
//!
//! This module contains the tasks that run alongside the HTTP server.

pub mod countdown_timer;
pub mod session_recovery;

// Re-export main functions
pub use countdown_timer::countdown_timer_task;
pub use session_recovery::recover_session;
