pub mod model;
pub mod store;

pub use model::{Session, User};
pub use store::SessionStore;
