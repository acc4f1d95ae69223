//! Error taxonomy shared by the form, access and aggregation layers.
//!
//! Form conversion raises [`ValidationError`] before anything touches the
//! store. Every store failure reaches callers as a [`DataAccessError`]. The
//! aggregation functions never fail.

use thiserror::Error;
use uuid::Uuid;

/// Caller-side rejection of a form, raised before any remote call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Field `{0}` is required")]
    MissingField(&'static str),

    #[error("Unknown class code: {0}")]
    UnknownClass(String),

    #[error("Unknown video category: {0}")]
    UnknownCategory(String),

    #[error("Unknown health status: {0}")]
    UnknownStatus(String),

    #[error("Unsupported video URL: {0}")]
    UnsupportedVideoUrl(String),

    #[error("Field `{field}` must be a positive number, got {value:?}")]
    InvalidMeasurement { field: &'static str, value: String },

    #[error("Field `{field}` must be a date (YYYY-MM-DD), got {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("A complaint description is required when the student is unwell")]
    ComplaintRequired,
}

/// Failure reported by a [`RowStore`](crate::db::RowStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No row in `{table}` with id {id}")]
    NotFound { table: String, id: Uuid },

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Refusing to write an empty row to `{0}`")]
    EmptyRow(String),

    #[error("Failed to encode filter value for `{column}`: {source}")]
    Encode {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failed call into the remote store, surfaced unchanged to the caller.
#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to decode `{table}` row: {source}")]
    Decode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode `{table}` row: {source}")]
    Encode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Row for `{0}` did not serialize to an object")]
    NotAnObject(&'static str),
}

impl DataAccessError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataAccessError::Store(StoreError::NotFound { .. }))
    }
}

/// Umbrella error for operations that validate a form and then write it.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

pub type Result<T> = std::result::Result<T, Error>;
