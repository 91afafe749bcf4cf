//! Cache backends. Each implements CachePort.

pub mod json_cache;
pub mod memory_cache;
pub mod sqlite_cache;

pub use json_cache::JsonFileCache;
pub use memory_cache::MemoryCache;
pub use sqlite_cache::SqliteCache;
