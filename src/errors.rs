use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameter validation error raised before any network call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ParameterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParameterError {}

impl From<String> for ParameterError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ParameterError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Failure reported inside an otherwise-successful GraphQL response.
///
/// The endpoint may return several errors at once; the display form joins
/// every server-reported message with `", "`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphQLError {
    pub messages: Vec<String>,
}

impl GraphQLError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Comma-joined server messages.
    pub fn message(&self) -> String {
        self.messages.join(", ")
    }
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for GraphQLError {}

/// Transport-level error (timeouts, DNS/TLS/connectivity, bad payloads).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    #[source]
    pub source: Option<reqwest::Error>,
}

/// Broad transport error kinds for classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Other => "transport",
        };
        write!(f, "{label}")
    }
}

/// Unified error type surfaced by the connector.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Parameter(#[from] ParameterError),

    #[error("{0}")]
    GraphQL(#[from] GraphQLError),

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("unknown operation: {0}")]
    Dispatch(String),

    /// Raised by the batch loop when an item fails and the host did not ask
    /// to continue past failures.
    #[error("{operation} operation failed: {message}")]
    Operation { operation: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Config(String),
}

/// Convenience alias for fallible connector results.
pub type Result<T, E = Error> = std::result::Result<T, E>;
