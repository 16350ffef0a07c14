//! In-memory transport for offline tests.
//!
//! Responses are queued FIFO; every request is recorded so tests can
//! assert on the documents and scopes that were (or were not) sent.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::Value;

use crate::envelope::GraphQLEnvelope;
use crate::errors::{Error, ParameterError, Result};
use crate::query::GraphQLRequest;
use crate::transport::{RequestScope, Transport};

/// Fixture queue for [`MockTransport`].
#[derive(Default)]
pub struct MockConfig {
    pub responses: Vec<Result<GraphQLEnvelope>>,
}

impl MockConfig {
    pub fn with_envelope(mut self, envelope: GraphQLEnvelope) -> Self {
        self.responses.push(Ok(envelope));
        self
    }

    /// Queue a healthy envelope wrapping `data`.
    pub fn with_data(self, data: Value) -> Self {
        self.with_envelope(GraphQLEnvelope::with_data(data))
    }

    /// Queue a server-side GraphQL failure.
    pub fn with_graphql_errors(self, messages: Vec<String>) -> Self {
        self.with_envelope(GraphQLEnvelope::with_errors(messages))
    }

    pub fn with_error(mut self, err: Error) -> Self {
        self.responses.push(Err(err));
        self
    }
}

/// Transport double that replays queued envelopes.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<MockInner>,
}

struct MockInner {
    responses: Mutex<VecDeque<Result<GraphQLEnvelope>>>,
    sent: Mutex<Vec<(GraphQLRequest, RequestScope)>>,
}

impl MockTransport {
    pub fn new(cfg: MockConfig) -> Self {
        Self {
            inner: Arc::new(MockInner {
                responses: Mutex::new(VecDeque::from(cfg.responses)),
                sent: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Requests seen so far, in order.
    pub fn sent(&self) -> Vec<(GraphQLRequest, RequestScope)> {
        self.inner.sent.lock().expect("lock poisoned").clone()
    }

    pub fn sent_count(&self) -> usize {
        self.inner.sent.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: GraphQLRequest, scope: RequestScope) -> Result<GraphQLEnvelope> {
        self.inner
            .sent
            .lock()
            .expect("lock poisoned")
            .push((request, scope));
        self.inner
            .responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(ParameterError::new("no mock response queued").into()))
    }
}
