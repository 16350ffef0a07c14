//! The seam between operations and the HTTP layer.

use std::time::Duration;

use async_trait::async_trait;

use crate::envelope::GraphQLEnvelope;
use crate::errors::Result;
use crate::query::GraphQLRequest;

/// Routing data that travels next to the document: the optional company
/// scope header and the per-call timeout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestScope {
    pub company_id: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestScope {
    /// Scope to one company.
    pub fn company(company_id: impl Into<String>) -> Self {
        Self {
            company_id: Some(company_id.into()),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Sends one GraphQL request and returns the parsed envelope.
///
/// Implemented by the reqwest-backed client and by the in-memory mock.
/// Implementations never retry; a failed round trip surfaces as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: GraphQLRequest, scope: RequestScope) -> Result<GraphQLEnvelope>;
}
