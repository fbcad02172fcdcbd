//! The steaks in the current cook session

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    cooking::{CookTimeTable, Steak, SteakInput},
    error::GrillResult,
    schedule::target_duration,
};

/// Ordered set of steaks for the current session.
/// Every steak in here has its cook times resolved.
#[derive(Debug, Clone)]
pub struct SteakCollection {
    table: Arc<CookTimeTable>,
    steaks: Vec<Steak>,
}

impl SteakCollection {
    pub fn new(table: Arc<CookTimeTable>) -> Self {
        Self {
            table,
            steaks: Vec::new(),
        }
    }

    /// Resolve cook times and append. Returns the new steak.
    pub fn add(&mut self, input: SteakInput) -> GrillResult<Steak> {
        let steak = input.resolve(&self.table)?;
        info!(
            "Added steak for {} ({}, {}): {}s + {}s",
            steak.person_name,
            steak.desired_doneness,
            steak.thickness,
            steak.first_side_time,
            steak.second_side_time
        );
        self.steaks.push(steak.clone());
        Ok(steak)
    }

    /// Replace the steak at `index`, resolving cook times again.
    /// `Ok(None)` means the index no longer exists and nothing was edited.
    pub fn edit(&mut self, index: usize, input: SteakInput) -> GrillResult<Option<Steak>> {
        let steak = input.resolve(&self.table)?;
        match self.steaks.get_mut(index) {
            Some(slot) => {
                info!("Edited steak {} -> {} ({}, {})", index, steak.person_name, steak.desired_doneness, steak.thickness);
                *slot = steak.clone();
                Ok(Some(steak))
            }
            None => {
                debug!("Edit of steak {} ignored: not found", index);
                Ok(None)
            }
        }
    }

    /// Remove the steak at `index`; a missing index is a no-op
    pub fn remove(&mut self, index: usize) -> Option<Steak> {
        if index < self.steaks.len() {
            let steak = self.steaks.remove(index);
            info!("Removed steak for {}", steak.person_name);
            Some(steak)
        } else {
            debug!("Remove of steak {} ignored: not found", index);
            None
        }
    }

    pub fn replace_all(&mut self, steaks: Vec<Steak>) {
        debug!("Replacing steak collection with {} steaks", steaks.len());
        self.steaks = steaks;
    }

    pub fn list(&self) -> &[Steak] {
        &self.steaks
    }

    pub fn len(&self) -> usize {
        self.steaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steaks.is_empty()
    }

    /// Session length for the steaks currently in the collection
    pub fn target_duration(&self) -> u64 {
        target_duration(&self.steaks)
    }
}
