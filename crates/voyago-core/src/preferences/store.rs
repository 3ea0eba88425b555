//! Travel preferences store.

use std::sync::Arc;

use crate::slice::{PersistedSlice, WriteReceipt};
use crate::store::KeyValueStore;

use super::model::{PreferencesUpdate, TravelPreferences};

/// Persisted travel preferences slice.
#[derive(Clone)]
pub struct PreferencesStore {
    slice: PersistedSlice<TravelPreferences>,
}

impl PreferencesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slice: PersistedSlice::new(store),
        }
    }

    /// Hydrates preferences from the durable store, merging stored fields
    /// over the defaults. Safe to call more than once.
    pub async fn load(&self) {
        self.slice.load().await;
    }

    /// Current preferences snapshot.
    pub fn read(&self) -> TravelPreferences {
        self.slice.read()
    }

    /// Whether the premium flag is set; consumers use this to gate screens.
    pub fn is_premium(&self) -> bool {
        self.slice.read().is_premium
    }

    /// Applies a partial update to memory and queues a durable write of the
    /// full record. Drop the receipt for fire-and-forget persistence.
    pub fn update(&self, update: PreferencesUpdate) -> WriteReceipt {
        self.slice.update_with(|preferences| update.apply(preferences))
    }
}
