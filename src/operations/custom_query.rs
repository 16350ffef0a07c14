use async_trait::async_trait;

use crate::errors::ParameterError;
use crate::query::{self, GraphQLRequest};
use crate::transport::Transport;
use crate::types::{OperationContext, OperationResult};

use super::{into_result, send_scoped, Operation};

/// Run a user-supplied GraphQL document as-is.
///
/// Query text and variables pass through unmodified; only the variables
/// string is parsed, and a malformed one is a parameter error rather than
/// a network failure.
pub struct CustomQuery;

impl CustomQuery {
    async fn run(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> crate::errors::Result<serde_json::Value> {
        let company_id = ctx.params.required("companyId", "Company ID")?;
        let text = ctx.params.str_param("query");
        if text.is_empty() {
            return Err(
                ParameterError::new("GraphQL query is required").with_field("query").into(),
            );
        }
        let variables = query::parse_variables(ctx.params.value("variables"))?;
        let request = GraphQLRequest::with_variables(text, variables);
        send_scoped(ctx, transport, request, Some(company_id)).await
    }
}

#[async_trait]
impl Operation for CustomQuery {
    fn name(&self) -> &'static str {
        "customQuery"
    }

    async fn execute(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> OperationResult {
        into_result(self.run(ctx, transport).await)
    }
}
