pub mod json_store;
pub mod memory_store;
pub mod paths;

pub use crate::json_store::JsonFileStore;
pub use crate::memory_store::InMemoryStore;
pub use crate::paths::SunaPaths;
