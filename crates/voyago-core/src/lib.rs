pub mod checklist;
pub mod error;
pub mod preferences;
pub mod session;
pub mod slice;
pub mod store;
pub mod theme;
pub mod visa;

// Re-export common error type
pub use error::VoyagoError;

#[cfg(test)]
pub(crate) mod test_support;
