//! Storage adapters for the key-value boundary.

#[cfg(feature = "http-store")]
mod http_kv_store;

#[cfg(feature = "http-store")]
pub use http_kv_store::HttpKeyValueStore;

#[cfg(feature = "file-store")]
mod json_file_store;

#[cfg(feature = "file-store")]
pub use json_file_store::JsonFileStore;
