//! Persisted snapshot of a running cook session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    cooking::Steak,
    error::StoreResult,
    services::{keys, KeyValueStore},
};

/// What is written to durable storage when a session starts.
/// This is the only thing recovery has to go on after a restart, so the
/// JSON shape (`steaks`, `endTime`, `remainingTime`) must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub steaks: Vec<Steak>,
    pub end_time: DateTime<Utc>,
    /// Session length in seconds at the moment it started
    pub remaining_time: u64,
}

impl SessionSnapshot {
    pub fn new(steaks: Vec<Steak>, end_time: DateTime<Utc>, remaining_time: u64) -> Self {
        Self {
            steaks,
            end_time,
            remaining_time,
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> StoreResult<()> {
        let json = serde_json::to_string(self)?;
        store.set(keys::SESSION_SNAPSHOT, &json)?;
        debug!("Session snapshot saved ({} steaks)", self.steaks.len());
        Ok(())
    }

    /// Read the snapshot. Read or parse failures are logged and reported as
    /// no snapshot at all.
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let raw = match store.get(keys::SESSION_SNAPSHOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read session snapshot: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Ignoring unreadable session snapshot: {}", e);
                None
            }
        }
    }

    pub fn clear(store: &dyn KeyValueStore) -> StoreResult<()> {
        store.remove(keys::SESSION_SNAPSHOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cooking::{Doneness, Thickness},
        services::MemoryStore,
    };
    use chrono::TimeZone;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot::new(
            vec![Steak {
                person_name: "Ana".into(),
                desired_doneness: Doneness::MediumRare,
                thickness: Thickness::OneAndHalf,
                first_side_time: 360,
                second_side_time: 300,
            }],
            Utc.with_ymd_and_hms(2026, 7, 4, 18, 11, 0).unwrap(),
            660,
        )
    }

    #[test]
    fn json_shape_matches_storage_format() {
        let value = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(value["remainingTime"], 660);
        assert_eq!(value["steaks"][0]["personName"], "Ana");
        assert_eq!(value["steaks"][0]["thickness"], 1.5);
        let end = value["endTime"].as_str().unwrap();
        assert!(end.starts_with("2026-07-04T18:11:00"));
    }

    #[test]
    fn reads_millisecond_iso_timestamps() {
        let raw = r#"{"steaks":[],"endTime":"2026-07-04T18:11:00.250Z","remainingTime":5}"#;
        let parsed: SessionSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.end_time.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn save_load_clear() {
        let store = MemoryStore::new();
        assert!(SessionSnapshot::load(&store).is_none());

        snapshot().save(&store).unwrap();
        assert_eq!(SessionSnapshot::load(&store), Some(snapshot()));

        SessionSnapshot::clear(&store).unwrap();
        assert!(SessionSnapshot::load(&store).is_none());
    }

    #[test]
    fn failures_read_as_absent() {
        let store = MemoryStore::new();
        store.set(keys::SESSION_SNAPSHOT, "{not json").unwrap();
        assert!(SessionSnapshot::load(&store).is_none());

        snapshot().save(&store).unwrap();
        store.set_failing(true);
        assert!(SessionSnapshot::load(&store).is_none());
    }
}
