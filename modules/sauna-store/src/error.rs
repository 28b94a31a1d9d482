use std::time::Duration;

use thiserror::Error;

use sauna_common::{ParseTagError, ValidationError};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Decode(err.to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err.to_string())
    }
}

impl From<ParseTagError> for StoreError {
    fn from(err: ParseTagError) -> Self {
        StoreError::Decode(err.to_string())
    }
}
