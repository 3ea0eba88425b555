//! Session store: simulated authentication over a persisted slice.
//!
//! There is no server and no credential store; any non-empty email with a
//! sufficiently long password is accepted. Validation failures surface as
//! boolean results, never as errors.

use std::sync::Arc;

use uuid::Uuid;

use crate::slice::PersistedSlice;
use crate::store::KeyValueStore;

use super::model::{Session, User};

/// Minimum accepted password length for the simulated credential check.
const MIN_PASSWORD_CHARS: usize = 6;

/// Fixed synthetic identity installed by [`SessionStore::bypass`].
const BYPASS_USER_ID: &str = "test-user";
const BYPASS_USER_EMAIL: &str = "test@example.com";
const BYPASS_USER_NAME: &str = "Utilisateur Test";

/// Persisted session slice plus its authentication operations.
#[derive(Clone)]
pub struct SessionStore {
    slice: PersistedSlice<Session>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slice: PersistedSlice::new(store),
        }
    }

    /// Hydrates the session from the durable store. Safe to call more than
    /// once; only the first call reads storage.
    pub async fn load(&self) {
        self.slice.load().await;
    }

    /// Current session snapshot.
    pub fn read(&self) -> Session {
        self.slice.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.slice.read().is_authenticated()
    }

    /// Simulated login: succeeds iff `email` is non-empty and `password`
    /// has at least six characters. On failure returns `false` without
    /// mutating state.
    pub fn login(&self, email: &str, password: &str) -> bool {
        if !credentials_acceptable(email, password) {
            return false;
        }
        self.install_user(email, None);
        true
    }

    /// Simulated registration: same acceptance rule as login, and always
    /// creates a new session (there is no account store to collide with).
    /// An explicit `name` wins over the email-derived default.
    pub fn register(&self, email: &str, password: &str, name: Option<&str>) -> bool {
        if !credentials_acceptable(email, password) {
            return false;
        }
        self.install_user(email, name);
        true
    }

    /// Unconditionally installs the fixed development identity.
    pub fn bypass(&self) {
        self.slice.update_with(|session| {
            session.user = Some(User {
                id: BYPASS_USER_ID.to_string(),
                email: BYPASS_USER_EMAIL.to_string(),
                name: Some(BYPASS_USER_NAME.to_string()),
            });
        });
    }

    /// Unconditional logout: resets memory to the unauthenticated default
    /// and queues removal of the durable record.
    pub fn logout(&self) {
        self.slice.clear();
    }

    fn install_user(&self, email: &str, name: Option<&str>) {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: Some(
                name.map(str::to_string)
                    .unwrap_or_else(|| derived_name(email)),
            ),
        };
        self.slice.update_with(|session| session.user = Some(user));
    }
}

fn credentials_acceptable(email: &str, password: &str) -> bool {
    !email.is_empty() && password.chars().count() >= MIN_PASSWORD_CHARS
}

/// Display name derived from the part of the email before `@`.
fn derived_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
