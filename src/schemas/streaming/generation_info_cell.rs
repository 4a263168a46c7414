use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::schemas::GenerationInfo;

/// Shared slot for generation metadata that a producer fills while a stream is running.
///
/// Providers usually report things like `finish_reason` on the last chunk, so the
/// producer keeps a clone of the cell and the consumer reads it once the stream is drained.
#[derive(Debug, Clone, Default)]
pub struct GenerationInfoCell(Arc<Mutex<Option<GenerationInfo>>>);

impl GenerationInfoCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, info: GenerationInfo) {
        *self.lock() = Some(info);
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.lock()
            .get_or_insert_with(GenerationInfo::new)
            .insert(key.into(), value);
    }

    /// Snapshot of the metadata recorded so far.
    pub fn get(&self) -> Option<GenerationInfo> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<GenerationInfo>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
