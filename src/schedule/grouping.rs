//! Synchronization target and per-action steak grouping

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cooking::Steak;

/// Something the cook has to do to a steak at a given moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SteakAction {
    Place,
    Flip,
}

/// Longest total cook time in the set; 0 when the set is empty.
/// Every steak finishes at this many seconds after session start.
pub fn target_duration(steaks: &[Steak]) -> u64 {
    steaks.iter().map(Steak::total_cooking_time).max().unwrap_or(0)
}

/// Offset used as the grouping key for `action`.
///
/// Place: the steak's own total cook time.
/// Flip: first side plus the delay before this steak goes on, which is
/// `target - total`. A steak at the target flips right at its first-side time.
pub fn action_offset(steak: &Steak, action: SteakAction, target: u64) -> u64 {
    match action {
        SteakAction::Place => steak.total_cooking_time(),
        SteakAction::Flip => {
            steak.first_side_time + target.saturating_sub(steak.total_cooking_time())
        }
    }
}

/// Steaks that share one exact offset for an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SteakGroup {
    pub action: SteakAction,
    pub offset: u64,
    /// Person names in collection order
    pub names: Vec<String>,
}

impl SteakGroup {
    /// Seconds after session start at which this group's notification fires
    pub fn fire_after(&self, target: u64) -> u64 {
        match self.action {
            SteakAction::Place => target.saturating_sub(self.offset),
            SteakAction::Flip => self.offset,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.action {
            SteakAction::Place => "Place Steaks",
            SteakAction::Flip => "Flip Steaks",
        }
    }

    pub fn body(&self) -> String {
        let names = self.names.join(" and ");
        let noun = if self.names.len() == 1 { "steak" } else { "steaks" };
        match self.action {
            SteakAction::Place => format!("It's time to place {names}'s {noun} on the grill!"),
            SteakAction::Flip => format!("Time to flip {names}'s {noun}!"),
        }
    }
}

/// Partition steaks by their offset for `action`. Two steaks land in the same
/// group only when their offsets are the same integer second. Groups come back
/// ordered by offset.
pub fn group_steaks(steaks: &[Steak], action: SteakAction, target: u64) -> Vec<SteakGroup> {
    if target == 0 {
        return Vec::new();
    }

    let mut grouped: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    for steak in steaks {
        grouped
            .entry(action_offset(steak, action, target))
            .or_default()
            .push(steak.person_name.clone());
    }

    grouped
        .into_iter()
        .map(|(offset, names)| SteakGroup { action, offset, names })
        .collect()
}
