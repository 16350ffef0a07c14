use async_trait::async_trait;

use crate::query::{self, GraphQLRequest, RecordsQuery};
use crate::transport::Transport;
use crate::types::{OperationContext, OperationResult};

use super::{into_result, send_scoped, Operation};

/// List records (todos/tasks) with conditional filtering.
///
/// A search term matching nothing is a legitimate empty result, not an
/// error.
pub struct GetRecords;

impl GetRecords {
    async fn run(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> crate::errors::Result<serde_json::Value> {
        let company_id = ctx.params.required("companyId", "Company ID")?;
        let records = RecordsQuery {
            company_id: company_id.clone(),
            project_id: ctx.params.locator("projectId"),
            search_term: ctx.params.str_param("searchTerm"),
            show_completed: ctx.params.bool_param("showCompleted", false),
            limit: ctx.params.u64_param("limit", 50),
            skip: ctx.params.u64_param("skip", 0),
        };
        let request = GraphQLRequest::new(query::records_query(&records));
        send_scoped(ctx, transport, request, Some(company_id)).await
    }
}

#[async_trait]
impl Operation for GetRecords {
    fn name(&self) -> &'static str {
        "getRecords"
    }

    async fn execute(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> OperationResult {
        into_result(self.run(ctx, transport).await)
    }
}
