//! Theme selection and its two fixed color palettes.
//!
//! The persisted record is only the binary light/dark choice; it resolves
//! deterministically to one of exactly two palettes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::slice::{PersistedSlice, SliceRecord, WriteReceipt};
use crate::store::KeyValueStore;

/// Persisted theme choice. Light by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSelection {
    pub is_dark: bool,
}

impl ThemeSelection {
    /// Resolves the selection to its concrete palette.
    pub fn palette(&self) -> &'static Palette {
        if self.is_dark {
            &Palette::DARK
        } else {
            &Palette::LIGHT
        }
    }
}

impl SliceRecord for ThemeSelection {
    const STORE_KEY: &'static str = "theme";
}

/// A concrete UI color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub surface: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub disabled: &'static str,
}

impl Palette {
    pub const LIGHT: Self = Self {
        background: "#FFFFFF",
        surface: "#F8FAFC",
        primary: "#2563EB",
        secondary: "#0891B2",
        accent: "#059669",
        success: "#10B981",
        warning: "#F59E0B",
        error: "#EF4444",
        text: "#1F2937",
        text_secondary: "#6B7280",
        border: "#E5E7EB",
        disabled: "#9CA3AF",
    };

    pub const DARK: Self = Self {
        background: "#111827",
        surface: "#1F2937",
        primary: "#3B82F6",
        secondary: "#06B6D4",
        accent: "#10B981",
        success: "#22C55E",
        warning: "#F59E0B",
        error: "#F87171",
        text: "#F9FAFB",
        text_secondary: "#D1D5DB",
        border: "#374151",
        disabled: "#6B7280",
    };
}

/// Persisted theme slice.
#[derive(Clone)]
pub struct ThemeStore {
    slice: PersistedSlice<ThemeSelection>,
}

impl ThemeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slice: PersistedSlice::new(store),
        }
    }

    /// Hydrates the selection from the durable store. Safe to call more
    /// than once.
    pub async fn load(&self) {
        self.slice.load().await;
    }

    pub fn read(&self) -> ThemeSelection {
        self.slice.read()
    }

    pub fn is_dark(&self) -> bool {
        self.slice.read().is_dark
    }

    pub fn palette(&self) -> &'static Palette {
        self.slice.read().palette()
    }

    /// Flips the light/dark selection and queues the durable write.
    pub fn toggle(&self) -> WriteReceipt {
        self.slice
            .update_with(|selection| selection.is_dark = !selection.is_dark)
    }

    pub fn set_dark(&self, is_dark: bool) -> WriteReceipt {
        self.slice.update_with(|selection| selection.is_dark = is_dark)
    }
}
