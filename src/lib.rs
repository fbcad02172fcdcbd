//! Steak Sync - grill several steaks to different doneness so they finish together
//!
//! This library resolves cook times per steak, computes one synchronized
//! countdown with staggered place/flip notifications, and keeps that countdown
//! alive across restarts by persisting it to durable storage.

pub mod config;
pub mod error;
pub mod cooking;
pub mod schedule;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{GrillError, GrillResult};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
