//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Subcategory not found
    #[error("Subcategory not found: {0}")]
    SubcategoryNotFound(String),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Uploaded icon not found
    #[error("Icon not found: {0}")]
    IconNotFound(String),

    /// Position outside of an ordered sequence (account index, reorder index)
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Validation error (missing or malformed user input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Wrong username or password at login
    #[error("Invalid credentials for: {0}")]
    InvalidCredentials(String),

    /// Operation needs a logged-in session
    #[error("Not logged in")]
    NotLoggedIn,

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Export error
    #[error("Export error: {0}")]
    ExportError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::CategoryNotFound(_)
            | Self::SubcategoryNotFound(_)
            | Self::ItemNotFound(_)
            | Self::IconNotFound(_)
            | Self::IndexOutOfRange { .. }
            | Self::ValidationError(_)
            | Self::InvalidCredentials(_)
            | Self::NotLoggedIn => true,
            Self::SerializationError(_) | Self::StorageError(_) | Self::ExportError(_) => false,
        }
    }

    /// Whether the error is a "target no longer exists" outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotFound(_)
                | Self::SubcategoryNotFound(_)
                | Self::ItemNotFound(_)
                | Self::IconNotFound(_)
                | Self::IndexOutOfRange { .. }
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
