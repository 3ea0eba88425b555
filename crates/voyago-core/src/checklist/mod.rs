pub mod model;
pub mod store;

pub use model::{Checklist, ChecklistItem, ChecklistProgress};
pub use store::ChecklistStore;
