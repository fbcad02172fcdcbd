//! User preferences

use tracing::warn;

use crate::{
    error::GrillResult,
    services::{keys, KeyValueStore},
};

/// Whether the "before you grill" intro is skipped. Defaults to false,
/// including when the stored value can't be read.
pub fn skip_intro(store: &dyn KeyValueStore) -> bool {
    match store.get(keys::SKIP_INTRO) {
        Ok(Some(raw)) => raw.trim() == "true",
        Ok(None) => false,
        Err(e) => {
            warn!("Failed to read intro preference: {}", e);
            false
        }
    }
}

pub fn set_skip_intro(store: &dyn KeyValueStore, skip: bool) -> GrillResult<()> {
    store.set(keys::SKIP_INTRO, if skip { "true" } else { "false" })?;
    Ok(())
}
