pub mod file_store;
pub mod memory_store;
pub mod paths;

pub use crate::file_store::FileKeyValueStore;
pub use crate::memory_store::MemoryKeyValueStore;
