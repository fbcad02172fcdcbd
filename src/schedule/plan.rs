//! Turning steak groups into the notifications for one session

use serde::{Deserialize, Serialize};

use super::grouping::{group_steaks, target_duration, SteakAction, SteakGroup};
use crate::cooking::Steak;

/// A notification to fire `fire_after_seconds` after session start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedNotification {
    pub fire_after_seconds: u64,
    pub title: String,
    pub body: String,
}

/// Everything the scheduler computes for the current collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePlan {
    pub target_seconds: u64,
    pub place_groups: Vec<SteakGroup>,
    pub flip_groups: Vec<SteakGroup>,
    /// Place groups, then flip groups, then the completion notice
    pub notifications: Vec<PlannedNotification>,
}

impl SchedulePlan {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

fn completion(steak_count: usize, target: u64) -> PlannedNotification {
    PlannedNotification {
        fire_after_seconds: target,
        title: "Steaks Ready".to_string(),
        body: if steak_count == 1 {
            "Steak is done!".to_string()
        } else {
            "Steaks are done!".to_string()
        },
    }
}

/// Compute the target and both groupings, and lay out every notification
pub fn plan_session(steaks: &[Steak]) -> SchedulePlan {
    let target = target_duration(steaks);
    let place_groups = group_steaks(steaks, SteakAction::Place, target);
    let flip_groups = group_steaks(steaks, SteakAction::Flip, target);

    let mut notifications: Vec<PlannedNotification> = place_groups
        .iter()
        .chain(flip_groups.iter())
        .map(|group| PlannedNotification {
            fire_after_seconds: group.fire_after(target),
            title: group.title().to_string(),
            body: group.body(),
        })
        .collect();

    if target > 0 {
        notifications.push(completion(steaks.len(), target));
    }

    SchedulePlan {
        target_seconds: target,
        place_groups,
        flip_groups,
        notifications,
    }
}
