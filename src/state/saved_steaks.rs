//! Saved steak templates, persisted in the key-value store

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::{
    cooking::{SavedSteak, SavedSteakInput},
    error::{GrillError, GrillResult, StoreError},
    services::{keys, KeyValueStore},
};

/// The saved steak set. Storage is the source of truth; nothing is cached.
/// Every read-modify-write of the list runs under `write_lock`.
#[derive(Clone)]
pub struct SavedSteaks {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl SavedSteaks {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> GrillResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|e| {
            GrillError::from(StoreError::Unavailable(format!("Failed to lock saved steaks: {}", e)))
        })
    }

    pub fn list(&self) -> GrillResult<Vec<SavedSteak>> {
        match self.store.get(keys::SAVED_STEAKS)? {
            Some(raw) => Ok(serde_json::from_str(&raw).map_err(StoreError::from)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, id: u64) -> GrillResult<Option<SavedSteak>> {
        Ok(self.list()?.into_iter().find(|s| s.id == id))
    }

    pub fn create(&self, input: SavedSteakInput) -> GrillResult<SavedSteak> {
        if input.person_name.trim().is_empty() {
            return Err(GrillError::invalid("person name must not be empty"));
        }

        let _guard = self.lock()?;
        let mut saved = self.list()?;
        let id = saved.iter().map(|s| s.id).max().map_or(1, |max| max + 1);
        let steak = SavedSteak::from_input(id, input);
        saved.push(steak.clone());
        self.write(&saved)?;

        info!("Saved steak {} for {}", id, steak.person_name);
        Ok(steak)
    }

    /// Edit in place. `Ok(None)` when the id is unknown.
    pub fn update(&self, id: u64, input: SavedSteakInput) -> GrillResult<Option<SavedSteak>> {
        if input.person_name.trim().is_empty() {
            return Err(GrillError::invalid("person name must not be empty"));
        }

        let _guard = self.lock()?;
        let mut saved = self.list()?;
        let Some(slot) = saved.iter_mut().find(|s| s.id == id) else {
            debug!("Update of saved steak {} ignored: not found", id);
            return Ok(None);
        };
        *slot = SavedSteak::from_input(id, input);
        let updated = slot.clone();
        self.write(&saved)?;

        info!("Updated saved steak {}", id);
        Ok(Some(updated))
    }

    /// Delete by id and purge its associated info. Returns whether anything
    /// was deleted; an unknown id is a no-op.
    pub fn delete(&self, id: u64) -> GrillResult<bool> {
        let _guard = self.lock()?;
        let mut saved = self.list()?;
        let before = saved.len();
        saved.retain(|s| s.id != id);
        let removed = saved.len() != before;

        if removed {
            self.write(&saved)?;
            info!("Deleted saved steak {}", id);
        } else {
            debug!("Delete of saved steak {} ignored: not found", id);
        }

        // Info can outlive its steak if an earlier delete failed halfway
        if let Err(e) = self.store.remove(&keys::saved_steak_info(id)) {
            warn!("Failed to purge info for saved steak {}: {}", id, e);
        }
        Ok(removed)
    }

    pub fn info(&self, id: u64) -> GrillResult<Option<String>> {
        Ok(self.store.get(&keys::saved_steak_info(id))?)
    }

    pub fn set_info(&self, id: u64, info: &str) -> GrillResult<()> {
        // Held so a concurrent delete can't purge the info before it lands
        let _guard = self.lock()?;
        if self.get(id)?.is_none() {
            return Err(GrillError::SavedSteakNotFound(id));
        }
        self.store.set(&keys::saved_steak_info(id), info)?;
        debug!("Stored info for saved steak {}", id);
        Ok(())
    }

    fn write(&self, saved: &[SavedSteak]) -> GrillResult<()> {
        let json = serde_json::to_string(saved).map_err(StoreError::from)?;
        self.store.set(keys::SAVED_STEAKS, &json)?;
        Ok(())
    }
}
