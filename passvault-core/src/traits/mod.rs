//! Storage layer abstraction trait definition

mod kv_store;

pub use kv_store::{InMemoryKeyValueStore, KeyValueStore};
