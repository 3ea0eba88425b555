//! Travel preparation checklist domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slice::SliceRecord;

/// The ten default preparation tasks seeded on first-ever load.
const DEFAULT_ITEM_TEXTS: [&str; 10] = [
    "Vérifier la validité du passeport",
    "Faire une demande de visa si nécessaire",
    "Souscrire une assurance voyage",
    "Réserver les vols",
    "Réserver l'hébergement",
    "Échanger de la monnaie locale",
    "Préparer les documents de voyage",
    "Faire ses bagages",
    "Confirmer les réservations",
    "Informer la banque du voyage",
];

/// One checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Unique within the list, generated at creation, stable for the
    /// item's lifetime.
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Seeded default items carry `false`; user-added items carry `true`.
    pub is_custom: bool,
}

impl ChecklistItem {
    pub(crate) fn custom(text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            completed: false,
            is_custom: true,
        }
    }
}

/// The ordered item collection; the whole collection is rewritten durably
/// on every mutation. Serialized as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Checklist {
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    /// The seeded default list, each item with a freshly generated id.
    pub fn seeded() -> Self {
        Self {
            items: DEFAULT_ITEM_TEXTS
                .iter()
                .map(|text| ChecklistItem {
                    id: Uuid::new_v4().to_string(),
                    text: (*text).to_string(),
                    completed: false,
                    is_custom: false,
                })
                .collect(),
        }
    }

    /// Read-side completion derivation; not stored state.
    pub fn progress(&self) -> ChecklistProgress {
        ChecklistProgress {
            completed: self.items.iter().filter(|item| item.completed).count(),
            total: self.items.len(),
        }
    }
}

impl SliceRecord for Checklist {
    const STORE_KEY: &'static str = "checklist";

    // Seeding happens at hydration and is written through immediately, so
    // the durable record and the in-memory list are identical afterwards.
    fn initial() -> Self {
        Self::seeded()
    }
}

/// Completion counts over the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
}

impl ChecklistProgress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}
