//! Utility functions

pub mod favicon;

/// Generate a fresh id for a category, subcategory, item or icon.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
