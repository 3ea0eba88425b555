//! Travel preferences domain model.

use serde::{Deserialize, Serialize};

use crate::slice::{HydrationStrategy, SliceRecord};

/// The user's travel profile.
///
/// Always fully defined: a stored partial record is merged over the
/// defaults at hydration, never replacing them, so new fields can be added
/// without a migration step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub language: String,
    pub currency: String,
    /// Country code of the traveller's nationality.
    pub nationality: String,
    /// Passport expiry date, kept as an opaque date string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_expiry: Option<String>,
    /// Gates premium screens; a read-only join performed by consumers.
    pub is_premium: bool,
}

impl Default for TravelPreferences {
    fn default() -> Self {
        Self {
            email: None,
            language: "france".to_string(),
            currency: "EUR".to_string(),
            nationality: "france".to_string(),
            passport_expiry: None,
            is_premium: false,
        }
    }
}

impl SliceRecord for TravelPreferences {
    const STORE_KEY: &'static str = "userPreferences";
    const HYDRATION: HydrationStrategy = HydrationStrategy::MergeOverDefaults;
}

/// Partial update to [`TravelPreferences`]: every present field overwrites,
/// every absent field is retained from the prior snapshot.
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub email: Option<String>,
    pub language: Option<String>,
    pub currency: Option<String>,
    pub nationality: Option<String>,
    pub passport_expiry: Option<String>,
    pub is_premium: Option<bool>,
}

impl PreferencesUpdate {
    pub(crate) fn apply(self, preferences: &mut TravelPreferences) {
        if let Some(email) = self.email {
            preferences.email = Some(email);
        }
        if let Some(language) = self.language {
            preferences.language = language;
        }
        if let Some(currency) = self.currency {
            preferences.currency = currency;
        }
        if let Some(nationality) = self.nationality {
            preferences.nationality = nationality;
        }
        if let Some(passport_expiry) = self.passport_expiry {
            preferences.passport_expiry = Some(passport_expiry);
        }
        if let Some(is_premium) = self.is_premium {
            preferences.is_premium = is_premium;
        }
    }
}
