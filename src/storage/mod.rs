//! Storage implementations

pub mod in_memory;
pub mod kv;

pub use in_memory::{InMemoryDataService, InMemoryKeyValueStore};
pub use kv::{DEFAULT_POSTS_KEY, KvDataService};
