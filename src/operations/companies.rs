use async_trait::async_trait;

use crate::query::{self, GraphQLRequest};
use crate::transport::Transport;
use crate::types::{OperationContext, OperationResult};

use super::{into_result, send_scoped, Operation};

/// List every company the token pair can access.
pub struct GetCompanies;

#[async_trait]
impl Operation for GetCompanies {
    fn name(&self) -> &'static str {
        "getCompanies"
    }

    async fn execute(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> OperationResult {
        let request = GraphQLRequest::new(query::companies_query());
        into_result(send_scoped(ctx, transport, request, None).await)
    }
}
