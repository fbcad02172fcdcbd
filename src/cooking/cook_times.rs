//! Cook-time lookup by doneness and thickness

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::steak::{Doneness, Thickness};
use crate::error::StoreResult;

/// Seconds per side for one doneness/thickness combination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookTimes {
    pub first_side: u64,
    pub second_side: u64,
}

impl CookTimes {
    pub const fn new(first_side: u64, second_side: u64) -> Self {
        Self { first_side, second_side }
    }

    pub fn total(&self) -> u64 {
        self.first_side + self.second_side
    }
}

/// One row of a cook-time table file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookTimeEntry {
    pub doneness: Doneness,
    pub thickness: Thickness,
    pub first_side: u64,
    pub second_side: u64,
}

// Direct high heat, seconds per side.
const BUILTIN: [(Doneness, Thickness, CookTimes); 20] = [
    (Doneness::Rare, Thickness::Half, CookTimes::new(120, 90)),
    (Doneness::MediumRare, Thickness::Half, CookTimes::new(150, 120)),
    (Doneness::Medium, Thickness::Half, CookTimes::new(180, 150)),
    (Doneness::MediumWell, Thickness::Half, CookTimes::new(210, 180)),
    (Doneness::WellDone, Thickness::Half, CookTimes::new(240, 210)),
    (Doneness::Rare, Thickness::One, CookTimes::new(240, 180)),
    (Doneness::MediumRare, Thickness::One, CookTimes::new(300, 240)),
    (Doneness::Medium, Thickness::One, CookTimes::new(360, 300)),
    (Doneness::MediumWell, Thickness::One, CookTimes::new(420, 360)),
    (Doneness::WellDone, Thickness::One, CookTimes::new(480, 420)),
    (Doneness::Rare, Thickness::OneAndHalf, CookTimes::new(300, 240)),
    (Doneness::MediumRare, Thickness::OneAndHalf, CookTimes::new(360, 300)),
    (Doneness::Medium, Thickness::OneAndHalf, CookTimes::new(420, 360)),
    (Doneness::MediumWell, Thickness::OneAndHalf, CookTimes::new(480, 420)),
    (Doneness::WellDone, Thickness::OneAndHalf, CookTimes::new(540, 480)),
    (Doneness::Rare, Thickness::Two, CookTimes::new(420, 360)),
    (Doneness::MediumRare, Thickness::Two, CookTimes::new(480, 420)),
    (Doneness::Medium, Thickness::Two, CookTimes::new(540, 480)),
    (Doneness::MediumWell, Thickness::Two, CookTimes::new(600, 540)),
    (Doneness::WellDone, Thickness::Two, CookTimes::new(660, 600)),
];

/// Static table of cook times. Read-only once built.
#[derive(Debug, Clone)]
pub struct CookTimeTable {
    entries: HashMap<(Doneness, Thickness), CookTimes>,
}

impl CookTimeTable {
    /// The table shipped with the daemon, covering every combination
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.iter().map(|(d, t, times)| ((*d, *t), *times)).collect(),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CookTimeEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| ((e.doneness, e.thickness), CookTimes::new(e.first_side, e.second_side)))
                .collect(),
        }
    }

    /// Load a table from a JSON file holding a list of entries
    pub fn load(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<CookTimeEntry> = serde_json::from_str(&raw)?;
        let table = Self::from_entries(entries);
        info!("Loaded {} cook-time entries from {}", table.len(), path.display());

        let missing = table.missing_combinations();
        if !missing.is_empty() {
            warn!("Cook-time table is missing {} combinations; they will resolve to zero", missing.len());
        }
        Ok(table)
    }

    /// Look up cook times. Combinations absent from the table resolve to zero
    /// so a gap in the table never blocks adding a steak.
    pub fn resolve(&self, doneness: Doneness, thickness: Thickness) -> CookTimes {
        match self.entries.get(&(doneness, thickness)) {
            Some(times) => *times,
            None => {
                warn!("No cook time for {} at {}, using zero", doneness, thickness);
                CookTimes::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn missing_combinations(&self) -> Vec<(Doneness, Thickness)> {
        Doneness::ALL
            .iter()
            .flat_map(|d| Thickness::ALL.iter().map(move |t| (*d, *t)))
            .filter(|key| !self.entries.contains_key(key))
            .collect()
    }
}

impl Default for CookTimeTable {
    fn default() -> Self {
        Self::builtin()
    }
}
