pub mod model;
pub mod store;

pub use model::{PreferencesUpdate, TravelPreferences};
pub use store::PreferencesStore;
