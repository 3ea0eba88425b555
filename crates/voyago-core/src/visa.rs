//! Visa requirement lookup over the static dataset.
//!
//! The dataset is an external, read-only collaborator. Lookups match the
//! `(nationality, destination)` pair case-insensitively; absence is a
//! valid, expected outcome, not an error.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One entry of the visa dataset.
///
/// The serde renames keep the original French dataset keys on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaRequirement {
    #[serde(rename = "nationalite")]
    pub nationality: String,
    pub destination: String,
    #[serde(rename = "visa_requis")]
    pub visa_required: bool,
    /// Maximum stay without a long-stay visa, in days.
    #[serde(rename = "duree_max")]
    pub max_stay_days: u32,
    /// Required passport validity beyond the stay, in months.
    #[serde(rename = "validite_passeport_mois")]
    pub passport_validity_months: u32,
    #[serde(rename = "lien_visa", default, skip_serializing_if = "Option::is_none")]
    pub visa_link: Option<String>,
}

/// In-memory view of the visa dataset.
#[derive(Debug, Clone, Default)]
pub struct VisaDataset {
    records: Vec<VisaRequirement>,
}

impl VisaDataset {
    pub fn new(records: Vec<VisaRequirement>) -> Self {
        Self { records }
    }

    /// Parses the dataset from its JSON encoding (an array of records).
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(Self {
            records: serde_json::from_str(raw)?,
        })
    }

    /// Case-insensitive exact match on the `(nationality, destination)`
    /// pair. `None` means "no data for this pair".
    pub fn lookup(&self, nationality: &str, destination: &str) -> Option<&VisaRequirement> {
        let nationality = nationality.to_lowercase();
        let destination = destination.to_lowercase();
        self.records.iter().find(|record| {
            record.nationality.to_lowercase() == nationality
                && record.destination.to_lowercase() == destination
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> VisaDataset {
        VisaDataset::from_json_str(
            r#"[
                {
                    "nationalite": "france",
                    "destination": "japan",
                    "visa_requis": false,
                    "duree_max": 90,
                    "validite_passeport_mois": 6
                },
                {
                    "nationalite": "france",
                    "destination": "chine",
                    "visa_requis": true,
                    "duree_max": 30,
                    "validite_passeport_mois": 6,
                    "lien_visa": "https://example.com/visa-chine"
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let dataset = dataset();
        let record = dataset.lookup("FRANCE", "Japan").expect("pair exists");
        assert!(!record.visa_required);
        assert_eq!(record.max_stay_days, 90);
        assert_eq!(record.passport_validity_months, 6);
        assert!(record.visa_link.is_none());
    }

    #[test]
    fn unknown_pair_is_absent_not_an_error() {
        let dataset = dataset();
        assert!(dataset.lookup("France", "Atlantis").is_none());
        assert!(dataset.lookup("Atlantis", "Japan").is_none());
    }

    #[test]
    fn records_keep_their_original_keys() {
        let dataset = dataset();
        let record = dataset.lookup("france", "chine").unwrap();
        assert!(record.visa_required);
        assert_eq!(
            record.visa_link.as_deref(),
            Some("https://example.com/visa-chine")
        );

        let encoded = serde_json::to_string(record).unwrap();
        assert!(encoded.contains("\"nationalite\""));
        assert!(encoded.contains("\"visa_requis\""));
        assert!(encoded.contains("\"duree_max\""));
    }

    #[test]
    fn malformed_dataset_is_a_serialization_error() {
        let err = VisaDataset::from_json_str("{not json").unwrap_err();
        assert!(err.is_serialization());
    }
}
