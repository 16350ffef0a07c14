//! GraphQL document construction.
//!
//! Blue's list endpoints take their filters inline in the document rather
//! than as bound variables, so every interpolated string literal goes
//! through [`quote`] and boolean/numeric values render bare. Field sets are
//! part of the output contract and must not be trimmed.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::ParameterError;
use crate::types::{CustomFieldUpdate, CustomFieldValue};

/// A ready-to-send GraphQL request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Value,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: json!({}),
        }
    }

    pub fn with_variables(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }
}

/// Escape and quote a string for inline interpolation into a document.
pub(crate) fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Quote a comma-separated id string as a GraphQL list literal.
fn quote_list(raw: &str) -> String {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(quote)
        .collect();
    format!("[{}]", items.join(", "))
}

/// Fixed document listing every company the token pair can access.
pub fn companies_query() -> &'static str {
    r#"query GetCompanies {
  companyList {
    items {
      id
      name
      slug
      description
      createdAt
    }
  }
}"#
}

/// Projects of one company, non-archived and non-template, in the fixed
/// `[position_ASC, name_ASC]` order.
pub fn projects_query(company_id: &str, skip: u64, take: u64) -> String {
    format!(
        r#"query FilteredProjectList {{
  projectList(
    filter: {{
      companyIds: [{company_id}]
      archived: false
      isTemplate: false
    }}
    sort: [position_ASC, name_ASC]
    skip: {skip}
    take: {take}
  ) {{
    items {{
      id
      name
      slug
      position
      archived
    }}
    totalCount
    pageInfo {{
      totalItems
      hasNextPage
    }}
  }}
}}"#,
        company_id = quote(company_id),
    )
}

/// Inputs for the records listing document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsQuery {
    pub company_id: String,
    /// Empty means no project clause.
    pub project_id: String,
    /// Empty means no search clause.
    pub search_term: String,
    pub show_completed: bool,
    pub limit: u64,
    pub skip: u64,
}

/// Records (todos/tasks) with conditional filter clauses.
///
/// The requested field set, nested associations included, is reproduced
/// verbatim for output compatibility with existing consumers.
pub fn records_query(q: &RecordsQuery) -> String {
    let mut filter = vec![format!("companyIds: [{}]", quote(&q.company_id))];
    if !q.project_id.is_empty() {
        filter.push(format!("projectIds: [{}]", quote(&q.project_id)));
    }
    filter.push(format!("showCompleted: {}", q.show_completed));
    filter.push("excludeArchivedProjects: true".to_string());
    if !q.search_term.is_empty() {
        filter.push(format!("search: {}", quote(&q.search_term)));
    }
    let filter = filter.join("\n        ");

    format!(
        r#"query ListRecordsAdvanced {{
  todoQueries {{
    todos(
      filter: {{
        {filter}
      }}
      sort: [duedAt_ASC, position_ASC]
      limit: {limit}
      skip: {skip}
    ) {{
      items {{
        id
        uid
        position
        title
        text
        html
        startedAt
        duedAt
        timezone
        color
        cover
        done
        archived
        createdAt
        updatedAt
        commentCount
        checklistCount
        checklistCompletedCount
        isRepeating
        todoList {{
          id
          title
        }}
        users {{
          id
          username
          email
        }}
        tags {{
          id
          title
          color
        }}
        customFields {{
          id
          name
          type
          value
          text
          number
          latitude
          longitude
          currency
        }}
        createdBy {{
          id
          username
        }}
      }}
      pageInfo {{
        totalPages
        totalItems
        page
        perPage
        hasNextPage
        hasPreviousPage
      }}
    }}
  }}
}}"#,
        limit = q.limit,
        skip = q.skip,
    )
}

/// Todo lists of one project, used by the cascading resolver.
pub fn todo_lists_query(project_id: &str) -> String {
    format!(
        r#"query GetProjectLists {{
  todoLists(projectId: {project_id}) {{
    id
    uid
    title
    position
    isDisabled
    isLocked
    createdAt
    updatedAt
  }}
}}"#,
        project_id = quote(project_id),
    )
}

/// Field set for the updateRecord mutation.
///
/// Empty strings and `None` mean "leave that field untouched"; only
/// supplied values reach the input object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    pub record_id: String,
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub due_date: String,
    pub position: Option<f64>,
    pub color: String,
    /// Move the record to another project.
    pub project_id: String,
    /// Move the record to another todo list.
    pub todo_list_id: String,
    pub custom_fields: Vec<CustomFieldUpdate>,
}

/// Mutation updating one record's scalar fields, optional moves and custom
/// fields.
pub fn update_record_mutation(update: &RecordUpdate) -> String {
    let mut input = vec![format!("id: {}", quote(&update.record_id))];
    if !update.title.is_empty() {
        input.push(format!("title: {}", quote(&update.title)));
    }
    if !update.description.is_empty() {
        input.push(format!("text: {}", quote(&update.description)));
    }
    if !update.start_date.is_empty() {
        input.push(format!("startedAt: {}", quote(&update.start_date)));
    }
    if !update.due_date.is_empty() {
        input.push(format!("duedAt: {}", quote(&update.due_date)));
    }
    if let Some(position) = update.position {
        input.push(format!("position: {position}"));
    }
    if !update.color.is_empty() {
        input.push(format!("color: {}", quote(&update.color)));
    }
    if !update.project_id.is_empty() {
        input.push(format!("projectId: {}", quote(&update.project_id)));
    }
    if !update.todo_list_id.is_empty() {
        input.push(format!("todoListId: {}", quote(&update.todo_list_id)));
    }
    if !update.custom_fields.is_empty() {
        let fields: Vec<String> = update
            .custom_fields
            .iter()
            .map(custom_field_literal)
            .collect();
        input.push(format!("customFields: [{}]", fields.join(", ")));
    }
    let input = input.join("\n      ");

    format!(
        r#"mutation UpdateRecord {{
  editTodo(
    input: {{
      {input}
    }}
  ) {{
    id
    uid
    title
    position
    updatedAt
  }}
}}"#
    )
}

/// Serialize one custom-field entry, emitting only the sub-fields of its
/// declared type.
fn custom_field_literal(field: &CustomFieldUpdate) -> String {
    let mut parts = vec![format!("customFieldId: {}", quote(&field.field_id))];
    match &field.value {
        CustomFieldValue::Text { text_value } => {
            parts.push(format!("text: {}", quote(text_value)));
        }
        CustomFieldValue::Number { number_value } => {
            parts.push(format!("number: {number_value}"));
        }
        CustomFieldValue::Selection { selection_ids } => {
            parts.push(format!("optionIds: {}", quote_list(selection_ids)));
        }
        CustomFieldValue::Checkbox { checkbox_value } => {
            parts.push(format!("checked: {checkbox_value}"));
        }
        CustomFieldValue::Phone {
            phone_number,
            region_code,
        } => {
            parts.push(format!("phone: {}", quote(phone_number)));
            if !region_code.is_empty() {
                parts.push(format!("regionCode: {}", quote(region_code)));
            }
        }
        CustomFieldValue::Location {
            latitude,
            longitude,
            location_text,
        } => {
            parts.push(format!("latitude: {latitude}"));
            parts.push(format!("longitude: {longitude}"));
            if !location_text.is_empty() {
                parts.push(format!("text: {}", quote(location_text)));
            }
        }
        CustomFieldValue::Countries {
            country_codes,
            countries_text,
        } => {
            parts.push(format!("countryCodes: {}", quote_list(country_codes)));
            if !countries_text.is_empty() {
                parts.push(format!("text: {}", quote(countries_text)));
            }
        }
    }
    format!("{{ {} }}", parts.join(", "))
}

/// Parse the customQuery `variables` parameter.
///
/// A JSON object passes through unmodified; a string is parsed as JSON and
/// a malformed string is a hard parameter error, raised before any network
/// call.
pub fn parse_variables(raw: Option<&Value>) -> Result<Value, ParameterError> {
    match raw {
        None | Some(Value::Null) => Ok(json!({})),
        Some(Value::Object(map)) => Ok(Value::Object(map.clone())),
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(json!({}));
            }
            serde_json::from_str(text).map_err(|err| {
                ParameterError::new(format!("variables must be valid JSON: {err}"))
                    .with_field("variables")
            })
        }
        Some(_) => Err(
            ParameterError::new("variables must be a JSON object").with_field("variables")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_query_omits_empty_clauses() {
        let doc = records_query(&RecordsQuery {
            company_id: "c1".into(),
            show_completed: false,
            limit: 50,
            skip: 0,
            ..Default::default()
        });
        assert!(doc.contains(r#"companyIds: ["c1"]"#));
        assert!(!doc.contains("projectIds:"));
        assert!(!doc.contains("search:"));
        assert!(doc.contains("showCompleted: false"));
        assert!(doc.contains("excludeArchivedProjects: true"));
    }

    #[test]
    fn records_query_includes_supplied_clauses() {
        let doc = records_query(&RecordsQuery {
            company_id: "c1".into(),
            project_id: "crm-113".into(),
            search_term: "patient".into(),
            show_completed: true,
            limit: 10,
            skip: 20,
        });
        assert!(doc.contains(r#"projectIds: ["crm-113"]"#));
        assert!(doc.contains(r#"search: "patient""#));
        assert!(doc.contains("limit: 10"));
        assert!(doc.contains("skip: 20"));
    }

    #[test]
    fn records_query_keeps_the_full_field_set() {
        let doc = records_query(&RecordsQuery {
            company_id: "c1".into(),
            ..Default::default()
        });
        for field in [
            "checklistCompletedCount",
            "isRepeating",
            "todoList",
            "customFields",
            "createdBy",
            "hasPreviousPage",
        ] {
            assert!(doc.contains(field), "missing field: {field}");
        }
    }

    #[test]
    fn quotes_are_escaped_in_interpolated_values() {
        let doc = records_query(&RecordsQuery {
            company_id: "c1".into(),
            search_term: r#"say "hi" \ bye"#.into(),
            ..Default::default()
        });
        assert!(doc.contains(r#"search: "say \"hi\" \\ bye""#));
    }

    #[test]
    fn projects_query_pins_scope_and_sort() {
        let doc = projects_query("c1", 0, 50);
        assert!(doc.contains(r#"companyIds: ["c1"]"#));
        assert!(doc.contains("archived: false"));
        assert!(doc.contains("isTemplate: false"));
        assert!(doc.contains("sort: [position_ASC, name_ASC]"));
    }

    #[test]
    fn update_mutation_includes_only_supplied_fields() {
        let doc = update_record_mutation(&RecordUpdate {
            record_id: "r1".into(),
            title: "New title".into(),
            position: Some(2.5),
            ..Default::default()
        });
        assert!(doc.contains(r#"id: "r1""#));
        assert!(doc.contains(r#"title: "New title""#));
        assert!(doc.contains("position: 2.5"));
        assert!(!doc.contains("text:"));
        assert!(!doc.contains("duedAt:"));
        assert!(!doc.contains("projectId:"));
        assert!(!doc.contains("customFields:"));
    }

    #[test]
    fn number_custom_field_serializes_only_its_value() {
        let doc = update_record_mutation(&RecordUpdate {
            record_id: "r1".into(),
            custom_fields: vec![CustomFieldUpdate {
                field_id: "f1".into(),
                value: CustomFieldValue::Number { number_value: 42.0 },
            }],
            ..Default::default()
        });
        assert!(doc.contains(r#"{ customFieldId: "f1", number: 42 }"#));
        assert!(!doc.contains("checked:"));
        assert!(!doc.contains("latitude:"));
    }

    #[test]
    fn selection_ids_split_into_a_list() {
        let doc = update_record_mutation(&RecordUpdate {
            record_id: "r1".into(),
            custom_fields: vec![CustomFieldUpdate {
                field_id: "f1".into(),
                value: CustomFieldValue::Selection {
                    selection_ids: "option1, option2,option3".into(),
                },
            }],
            ..Default::default()
        });
        assert!(doc.contains(r#"optionIds: ["option1", "option2", "option3"]"#));
    }

    #[test]
    fn variables_parse_object_and_string() {
        use serde_json::json;
        assert_eq!(parse_variables(None).unwrap(), json!({}));
        assert_eq!(
            parse_variables(Some(&json!({ "a": 1 }))).unwrap(),
            json!({ "a": 1 })
        );
        assert_eq!(
            parse_variables(Some(&json!(r#"{"a": 1}"#))).unwrap(),
            json!({ "a": 1 })
        );
        assert!(parse_variables(Some(&json!("not json"))).is_err());
    }
}
