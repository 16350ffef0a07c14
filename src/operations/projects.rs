use async_trait::async_trait;

use crate::query::{self, GraphQLRequest};
use crate::transport::Transport;
use crate::types::{OperationContext, OperationResult};

use super::{into_result, send_scoped, Operation};

/// List one company's active, non-template projects.
pub struct GetProjects;

impl GetProjects {
    async fn run(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> crate::errors::Result<serde_json::Value> {
        let company_id = ctx.params.required("companyId", "Company ID")?;
        let skip = ctx.params.u64_param("skip", 0);
        let take = ctx.params.u64_param("take", 50);
        let request = GraphQLRequest::new(query::projects_query(&company_id, skip, take));
        send_scoped(ctx, transport, request, Some(company_id)).await
    }
}

#[async_trait]
impl Operation for GetProjects {
    fn name(&self) -> &'static str {
        "getProjects"
    }

    async fn execute(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> OperationResult {
        into_result(self.run(ctx, transport).await)
    }
}
