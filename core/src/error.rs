//! Error types for the users API client and the dashboard.
//!
//! # Design
//! `FetchError` is the only error the API layer raises. `NotFound` gets a
//! dedicated variant so a missing record can be told apart from an
//! unexpected status. `DashboardError` covers intents the
//! orchestrator refuses before any network call is made.

use thiserror::Error;

use crate::form::SubmitError;
use crate::store::StoreError;
use crate::types::UserId;

/// A request could not be delivered or no response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors returned by the `UsersClient` parse methods and `UsersApi`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A body was required but the server sent nothing, `null` or `{}`.
    #[error("no user data received from server")]
    EmptyBody,

    #[error("deserialization failed: {0}")]
    Decode(String),

    #[error("serialization failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Intents the dashboard refuses outright.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// Another create, update or delete for this record has not finished.
    #[error("an operation on user {0} is already in progress")]
    Busy(UserId),

    #[error("no user is being edited")]
    NotEditing,

    /// The record only exists locally; the server has nothing to update.
    #[error("user {0} has not been saved to the server yet")]
    PendingRecord(UserId),

    #[error("user {0} is not in the list")]
    UnknownRecord(UserId),

    #[error(transparent)]
    Form(#[from] SubmitError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
