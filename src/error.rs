//! Error types surfaced by the persistence layer.
//!
//! Every storage operation fails with a [`StoreError`]. `NotFound` messages
//! are safe to show to a caller as-is. `StorageFailure` carries the driver
//! error that caused it; that cause is logged when the error is turned into
//! an [`ApiError`] and is never part of the rendered message.

use serde::Serialize;
use thiserror::Error;

/// Boxed internal cause of a storage failure.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message used in place of any storage failure's own message.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Failure of a storage operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A by-id operation matched no row, or a lookup missed.
    #[error("404: {message}")]
    NotFound {
        /// Caller-safe description of what was missing.
        message: String,
    },

    /// The store, a statement, or a transaction boundary failed.
    #[error("500: {message}")]
    StorageFailure {
        /// Internal description, logged but never rendered.
        message: String,
        /// Driver or codec error behind the failure.
        #[source]
        cause: Option<Cause>,
    },

    /// Caller-supplied data was rejected before reaching storage.
    #[error("400: {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Result alias used across the crate.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

impl StoreError {
    /// A miss with a custom message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// The standard miss for `type_name` with `id`.
    pub fn no_such(type_name: &str, id: i64) -> Self {
        Self::not_found(format!("No {type_name} with id {id} exist"))
    }

    /// A storage failure wrapping `cause`.
    pub fn storage(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self::StorageFailure {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// A rejected field value.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for [`StoreError::StorageFailure`].
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::StorageFailure { .. })
    }

    /// Machine status code, HTTP-flavoured.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::StorageFailure { .. } => 500,
            Self::Validation { .. } => 400,
        }
    }

    /// The message that may cross the service boundary.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { message } => message.clone(),
            Self::StorageFailure { .. } => INTERNAL_SERVER_ERROR.to_string(),
            Self::Validation { field, message } => format!("{field}: {message}"),
        }
    }

    /// Converts into the response-safe form, logging any concealed cause.
    pub fn to_api_error(&self) -> ApiError {
        if let Self::StorageFailure { message, cause } = self {
            match cause {
                Some(cause) => tracing::error!(error = %cause, "{message}"),
                None => tracing::error!("{message}"),
            }
        }

        ApiError {
            status: self.status(),
            message: self.public_message(),
            developer_info: String::new(),
        }
    }
}

/// Serializable error body handed to the response layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Status code, see [`StoreError::status`].
    pub status: u16,
    /// Message safe to show to the caller.
    pub message: String,
    /// Extra detail for developers. Always empty for storage failures.
    pub developer_info: String,
}
