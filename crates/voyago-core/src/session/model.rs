//! Session domain model.
//!
//! The session record holds the authenticated user identity. It is always
//! well-formed: an unauthenticated process simply has no user.

use serde::{Deserialize, Serialize};

use crate::slice::SliceRecord;

/// The authenticated user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque unique identifier, generated at login/registration.
    pub id: String,
    /// Non-empty email address.
    pub email: String,
    /// Display name; derived from the email when not given explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Persisted session state: authenticated iff a user is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl SliceRecord for Session {
    const STORE_KEY: &'static str = "user";
}
