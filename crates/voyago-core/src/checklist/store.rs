//! Checklist store.
//!
//! Every mutation rewrites the entire collection durably. Default items are
//! protected from deletion at this layer; only custom items can be removed.

use std::sync::Arc;

use crate::slice::{PersistedSlice, WriteReceipt};
use crate::store::KeyValueStore;

use super::model::{Checklist, ChecklistItem, ChecklistProgress};

/// Persisted checklist slice plus its item operations.
#[derive(Clone)]
pub struct ChecklistStore {
    slice: PersistedSlice<Checklist>,
}

impl ChecklistStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slice: PersistedSlice::new(store),
        }
    }

    /// Hydrates the checklist from the durable store. On first-ever load
    /// the ten default items are seeded and persisted immediately. Safe to
    /// call more than once.
    pub async fn load(&self) {
        self.slice.load().await;
    }

    /// Current item collection, in order.
    pub fn items(&self) -> Vec<ChecklistItem> {
        self.slice.read().items
    }

    pub fn progress(&self) -> ChecklistProgress {
        self.slice.read().progress()
    }

    /// Appends a custom item with a fresh id. Empty or whitespace-only
    /// text is rejected as a no-op.
    pub fn add_item(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let item = ChecklistItem::custom(text.to_string());
        self.slice.update_with(|checklist| checklist.items.push(item));
        true
    }

    /// Flips `completed` for the matching item. Unknown ids are a no-op.
    pub fn toggle_item(&self, id: &str) -> bool {
        self.slice
            .update_if(|checklist| {
                match checklist.items.iter_mut().find(|item| item.id == id) {
                    Some(item) => {
                        item.completed = !item.completed;
                        true
                    }
                    None => false,
                }
            })
            .is_some()
    }

    /// Queues a durable write of the current list and returns its receipt,
    /// for callers that need confirmation the queued mutations landed.
    pub fn flush(&self) -> WriteReceipt {
        self.slice.flush()
    }

    /// Removes the matching item if it is a custom one. Default items and
    /// unknown ids are a no-op.
    pub fn remove_item(&self, id: &str) -> bool {
        self.slice
            .update_if(|checklist| {
                let before = checklist.items.len();
                checklist
                    .items
                    .retain(|item| !(item.id == id && item.is_custom));
                checklist.items.len() != before
            })
            .is_some()
    }
}
