//! Steak model and cook-time lookup
//!
//! Everything here is plain data: no I/O beyond loading a cook-time table file.

pub mod cook_times;
pub mod saved_steak;
pub mod steak;

pub use cook_times::{CookTimeEntry, CookTimeTable, CookTimes};
pub use saved_steak::{SavedSteak, SavedSteakInput};
pub use steak::{Doneness, Steak, SteakInput, Thickness};
