use async_trait::async_trait;

use crate::query::{self, GraphQLRequest, RecordUpdate};
use crate::transport::Transport;
use crate::types::{OperationContext, OperationResult};

use super::{into_result, send_scoped, Operation};

/// Update one record's scalar fields, move it between projects or todo
/// lists, and write custom-field values.
pub struct UpdateRecord;

impl UpdateRecord {
    async fn run(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> crate::errors::Result<serde_json::Value> {
        let company_id = ctx.params.required("companyId", "Company ID")?;
        let record_id = ctx.params.required("recordId", "Record ID")?;
        let update = RecordUpdate {
            record_id,
            title: ctx.params.str_param("title"),
            description: ctx.params.str_param("description"),
            start_date: ctx.params.str_param("startDate"),
            due_date: ctx.params.str_param("dueDate"),
            position: ctx.params.f64_param("position"),
            color: ctx.params.str_param("color"),
            project_id: ctx.params.locator("projectId"),
            todo_list_id: ctx.params.locator("todoListId"),
            custom_fields: ctx.params.custom_fields("customFields")?,
        };
        let request = GraphQLRequest::new(query::update_record_mutation(&update));
        send_scoped(ctx, transport, request, Some(company_id)).await
    }
}

#[async_trait]
impl Operation for UpdateRecord {
    fn name(&self) -> &'static str {
        "updateRecord"
    }

    async fn execute(
        &self,
        ctx: &OperationContext,
        transport: &dyn Transport,
    ) -> OperationResult {
        into_result(self.run(ctx, transport).await)
    }
}
