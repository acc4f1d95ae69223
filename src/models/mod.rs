pub mod class;
pub mod complaint;
pub mod health_record;
pub mod settings;
pub mod student;
pub mod teacher;
pub mod video;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Reference to the account that owns a student or teacher profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountRef(pub Uuid);

/// Form inputs use `""` for "not filled in"; storage uses absent.
pub(crate) fn optional_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn required_text(field: &'static str, input: &str) -> Result<String, ValidationError> {
    optional_text(input).ok_or(ValidationError::MissingField(field))
}

/// Normalize an already-typed optional so `Some("")` never reaches the store.
pub(crate) fn normalize(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(optional_text)
}

/// Inverse of [`optional_text`] for pre-filling edit forms.
pub(crate) fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Case-insensitive substring search used by the admin tables.
pub(crate) fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
