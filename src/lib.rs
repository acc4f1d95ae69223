// Library exports for binary tools and tests
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::{DataAccessError, Error, Result, StoreError, ValidationError};
