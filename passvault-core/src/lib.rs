//! passvault Core Library
//!
//! Provides the platform-independent logic of the password manager:
//! - Data model (category → subcategory → item → account tree)
//! - Password strength scoring
//! - Tree query (search filter, security overview) and mutation engine
//! - CSV export, user directory (login gate) and icon collection
//!
//! Storage is abstracted behind the [`KeyValueStore`] trait so the same
//! services run against an HTTP key-value backend, a local file or memory.

pub mod error;
pub mod services;
pub mod strength;
pub mod traits;
pub mod tree;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{InMemoryKeyValueStore, KeyValueStore};
