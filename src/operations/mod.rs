//! Operation registry and dispatch.
//!
//! Each operation runs end-to-end for one item: extract parameters, build
//! the document, send, normalize. Failures of any kind are folded into the
//! returned [`OperationResult`]; nothing escapes an operation's boundary,
//! so the host loop never crashes on a single bad item.

use async_trait::async_trait;
use serde_json::Value;

use crate::envelope::normalize;
use crate::errors::{Error, Result};
use crate::query::GraphQLRequest;
use crate::transport::{RequestScope, Transport};
use crate::types::{OperationContext, OperationResult};

mod companies;
mod custom_query;
mod projects;
mod records;
mod update_record;

pub use companies::GetCompanies;
pub use custom_query::CustomQuery;
pub use projects::GetProjects;
pub use records::GetRecords;
pub use update_record::UpdateRecord;

/// One user-selectable action, translating parameters into a single
/// GraphQL request/response cycle.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Operation identifier as supplied by the host.
    fn name(&self) -> &'static str;

    async fn execute(&self, ctx: &OperationContext, transport: &dyn Transport)
        -> OperationResult;
}

/// Every operation the connector knows about.
pub static REGISTRY: &[&dyn Operation] = &[
    &GetCompanies,
    &GetProjects,
    &GetRecords,
    &UpdateRecord,
    &CustomQuery,
];

/// Look up an operation by its host-facing name.
pub fn find(name: &str) -> Option<&'static dyn Operation> {
    REGISTRY.iter().copied().find(|op| op.name() == name)
}

/// Dispatch one item to its operation.
///
/// An unknown name fails before any transport call.
pub async fn dispatch(
    name: &str,
    ctx: &OperationContext,
    transport: &dyn Transport,
) -> Result<OperationResult> {
    let op = find(name).ok_or_else(|| Error::Dispatch(name.to_string()))?;
    Ok(op.execute(ctx, transport).await)
}

/// Shared tail of every operation: send under the item's timeout and
/// company scope, then normalize the envelope.
pub(crate) async fn send_scoped(
    ctx: &OperationContext,
    transport: &dyn Transport,
    request: GraphQLRequest,
    company_id: Option<String>,
) -> Result<Value> {
    let scope = RequestScope {
        company_id,
        timeout: Some(ctx.options.timeout()),
    };
    let envelope = transport.send(request, scope).await?;
    Ok(normalize(envelope, ctx.options.full_response)?)
}

/// Fold any pipeline failure into a host-facing result.
pub(crate) fn into_result(outcome: Result<Value>) -> OperationResult {
    match outcome {
        Ok(data) => OperationResult::ok(data),
        Err(err) => OperationResult::fail(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::envelope::GraphQLEnvelope;
    use crate::locator::Parameters;
    use crate::types::Credentials;

    /// Counts round trips and replays one canned envelope.
    struct CountingTransport {
        calls: AtomicUsize,
        data: Value,
    }

    impl CountingTransport {
        fn new(data: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                data,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn send(
            &self,
            _request: GraphQLRequest,
            _scope: RequestScope,
        ) -> Result<GraphQLEnvelope> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GraphQLEnvelope::with_data(self.data.clone()))
        }
    }

    fn ctx(params: Value) -> OperationContext {
        OperationContext::new(
            0,
            Credentials::new("id", "secret"),
            Parameters::from_value(params),
        )
    }

    #[tokio::test]
    async fn unknown_operation_never_reaches_the_transport() {
        let transport = CountingTransport::new(json!({}));
        let err = dispatch("doesNotExist", &ctx(json!({})), &transport)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Dispatch(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_company_fails_before_the_transport() {
        let transport = CountingTransport::new(json!({}));
        let result = dispatch("getRecords", &ctx(json!({})), &transport)
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Company ID is required"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_variables_fail_before_the_transport() {
        let transport = CountingTransport::new(json!({}));
        let params = json!({
            "companyId": "c1",
            "query": "query { companyList { items { id } } }",
            "variables": "{ nope",
        });
        let result = dispatch("customQuery", &ctx(params), &transport)
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("variables must be valid JSON"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn get_companies_round_trips() {
        let data = json!({ "companyList": { "items": [{ "id": "c1", "name": "Acme", "slug": "acme" }] } });
        let transport = CountingTransport::new(data.clone());
        let result = dispatch("getCompanies", &ctx(json!({})), &transport)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.data.unwrap(), data);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn registry_names_are_unique() {
        let mut names: Vec<_> = REGISTRY.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), REGISTRY.len());
    }
}
