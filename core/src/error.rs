//! Error types for the DataForSEO API client.
//!
//! # Design
//! `RemoteTask` gets a dedicated variant because callers frequently branch on
//! the remote status code (quota exhaustion vs. malformed query). Transport
//! failures never appear here: the transport is caller-owned, so connection
//! errors and non-2xx statuses stay on the caller's side of the capability
//! boundary. The only transport symptom the core can see is a body that does
//! not decode, which lands in `DeserializationError`.

use std::fmt;

/// Errors returned by `DataForSeoClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The caller supplied no usable query: no identifiers and no task id,
    /// or an input shape the endpoint does not accept. Raised before any
    /// request is built.
    InvalidInput(String),

    /// The response envelope reported one or more failed tasks. Carries the
    /// status of the first failing task entry.
    RemoteTask { status_code: u32, message: String },

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// The response body could not be deserialized into the expected shape.
    DeserializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            ApiError::RemoteTask { status_code, message } => {
                write!(f, "remote task failed ({status_code}): {message}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
