//! Cascading searchable lookups backing the host's dropdown UI.
//!
//! Three lookups, each one round trip: companies, projects scoped by
//! company, todo lists scoped by company and project. Filtering and
//! sorting happen client-side. Resolvers never fail past their boundary,
//! the host always needs something to render, so a missing upstream scope
//! or any network/parse failure becomes a single sentinel row with an
//! empty id.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::envelope::normalize;
use crate::errors::Result;
use crate::locator::Parameters;
use crate::query::{self, GraphQLRequest};
use crate::transport::{RequestScope, Transport};
use crate::types::SearchItem;

/// Sentinel shown while the company scope is not picked yet.
pub const SELECT_COMPANY_FIRST: &str = "Please select a company first";

/// Sentinel shown while the project scope is not picked yet.
pub const SELECT_PROJECT_FIRST: &str = "Please select a project first";

#[derive(Debug, Deserialize)]
struct CompanyRow {
    id: String,
    name: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
struct ProjectRow {
    id: String,
    name: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoListRow {
    id: String,
    uid: String,
    title: String,
    #[serde(default)]
    position: f64,
    #[serde(default)]
    is_disabled: bool,
}

/// Companies the token pair can access, labeled `name (slug)`.
pub async fn search_companies(transport: &dyn Transport, filter: Option<&str>) -> Vec<SearchItem> {
    companies(transport, filter)
        .await
        .unwrap_or_else(error_sentinel)
}

/// Projects of the company picked in the sibling `companyId` parameter.
pub async fn search_projects(
    transport: &dyn Transport,
    params: &Parameters,
    filter: Option<&str>,
) -> Vec<SearchItem> {
    let company_id = params.locator("companyId");
    if company_id.is_empty() {
        return vec![SearchItem::sentinel(SELECT_COMPANY_FIRST)];
    }
    projects(transport, &company_id, filter)
        .await
        .unwrap_or_else(error_sentinel)
}

/// Todo lists of the project picked in the sibling parameters. Disabled
/// lists are excluded and the rest sort ascending by position.
pub async fn search_todo_lists(
    transport: &dyn Transport,
    params: &Parameters,
    filter: Option<&str>,
) -> Vec<SearchItem> {
    let company_id = params.locator("companyId");
    if company_id.is_empty() {
        return vec![SearchItem::sentinel(SELECT_COMPANY_FIRST)];
    }
    let project_id = params.locator("projectId");
    if project_id.is_empty() {
        return vec![SearchItem::sentinel(SELECT_PROJECT_FIRST)];
    }
    todo_lists(transport, &company_id, &project_id, filter)
        .await
        .unwrap_or_else(error_sentinel)
}

async fn companies(transport: &dyn Transport, filter: Option<&str>) -> Result<Vec<SearchItem>> {
    let request = GraphQLRequest::new(query::companies_query());
    let envelope = transport.send(request, RequestScope::default()).await?;
    let data = normalize(envelope, false)?;
    let rows: Vec<CompanyRow> = rows_at(&data, &["companyList", "items"])?;
    Ok(rows
        .into_iter()
        .filter(|row| matches_filter(filter, &[row.name.as_str(), row.slug.as_str()]))
        .map(|row| SearchItem::new(format!("{} ({})", row.name, row.slug), row.id))
        .collect())
}

async fn projects(
    transport: &dyn Transport,
    company_id: &str,
    filter: Option<&str>,
) -> Result<Vec<SearchItem>> {
    let request = GraphQLRequest::new(query::projects_query(company_id, 0, 50));
    let envelope = transport
        .send(request, RequestScope::company(company_id))
        .await?;
    let data = normalize(envelope, false)?;
    let rows: Vec<ProjectRow> = rows_at(&data, &["projectList", "items"])?;
    Ok(rows
        .into_iter()
        .filter(|row| matches_filter(filter, &[row.name.as_str(), row.slug.as_str()]))
        .map(|row| SearchItem::new(format!("{} ({})", row.name, row.slug), row.id))
        .collect())
}

async fn todo_lists(
    transport: &dyn Transport,
    company_id: &str,
    project_id: &str,
    filter: Option<&str>,
) -> Result<Vec<SearchItem>> {
    let request = GraphQLRequest::new(query::todo_lists_query(project_id));
    let envelope = transport
        .send(request, RequestScope::company(company_id))
        .await?;
    let data = normalize(envelope, false)?;
    let mut rows: Vec<TodoListRow> = rows_at(&data, &["todoLists"])?;
    rows.retain(|row| {
        matches_filter(filter, &[row.title.as_str(), row.uid.as_str()]) && !row.is_disabled
    });
    rows.sort_by(|a, b| {
        a.position
            .partial_cmp(&b.position)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(rows
        .into_iter()
        .map(|row| SearchItem::new(format!("{} ({})", row.title, row.uid), row.id))
        .collect())
}

/// Rows under a nested path; an absent path is an empty list, matching the
/// endpoint's habit of omitting empty collections.
fn rows_at<T: DeserializeOwned>(data: &Value, path: &[&str]) -> Result<Vec<T>> {
    let mut node = data;
    for key in path {
        node = match node.get(key) {
            Some(value) => value,
            None => return Ok(Vec::new()),
        };
    }
    if node.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(node.clone())?)
}

fn matches_filter(filter: Option<&str>, haystacks: &[&str]) -> bool {
    let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return true;
    };
    let needle = filter.to_lowercase();
    haystacks
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
}

fn error_sentinel(err: crate::errors::Error) -> Vec<SearchItem> {
    vec![SearchItem::sentinel(format!("Error: {err}"))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        assert!(matches_filter(Some("ACME"), &["Acme Corp", "acme"]));
        assert!(matches_filter(Some("corp"), &["Acme Corp", "acme"]));
        assert!(!matches_filter(Some("zz"), &["Acme Corp", "acme"]));
        assert!(matches_filter(None, &["anything"]));
        assert!(matches_filter(Some("  "), &["anything"]));
    }

    #[test]
    fn rows_at_tolerates_missing_paths() {
        let data = serde_json::json!({ "companyList": {} });
        let rows: Vec<CompanyRow> = rows_at(&data, &["companyList", "items"]).unwrap();
        assert!(rows.is_empty());
    }
}
