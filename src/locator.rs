//! The raw per-item parameter bag and resource-locator normalization.
//!
//! Hosts hand identifiers over in two shapes: a bare string typed by the
//! user, or a `{mode, value}` pair picked from a searchable dropdown.
//! [`ResourceLocator`] models that as an explicit two-variant union, and
//! normalization collapses either shape to a plain identifier without ever
//! failing. Validation of an empty identifier is the operation's job.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ParameterError;
use crate::types::{CallOptions, CustomFieldUpdate};

/// Entry mode of a resource-locator parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LocatorMode {
    List,
    Id,
}

/// A parameter that is either a bare identifier or a dropdown selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResourceLocator {
    Plain(String),
    FromList { mode: LocatorMode, value: String },
}

impl ResourceLocator {
    /// Collapse to a bare identifier. Empty when no value was entered.
    pub fn into_id(self) -> String {
        match self {
            ResourceLocator::Plain(value) => value,
            ResourceLocator::FromList { value, .. } => value,
        }
    }

    pub fn as_id(&self) -> &str {
        match self {
            ResourceLocator::Plain(value) => value,
            ResourceLocator::FromList { value, .. } => value,
        }
    }
}

/// Normalize a raw locator-shaped value to a bare identifier.
///
/// Absent or malformed locators resolve to `""` rather than erroring, so
/// required-field validation stays with the operation that needs the id.
pub fn normalize_locator(raw: Option<&Value>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match serde_json::from_value::<ResourceLocator>(raw.clone()) {
        Ok(locator) => locator.into_id(),
        Err(_) => String::new(),
    }
}

/// Read-only view over the raw parameters the host supplies for one item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build from any JSON value; non-objects become an empty bag.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String parameter, trimmed. `""` when absent or not a string.
    pub fn str_param(&self, name: &str) -> String {
        match self.value(name) {
            Some(Value::String(s)) => s.trim().to_string(),
            _ => String::new(),
        }
    }

    pub fn bool_param(&self, name: &str, default: bool) -> bool {
        match self.value(name) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    pub fn u64_param(&self, name: &str, default: u64) -> u64 {
        self.value(name)
            .and_then(Value::as_u64)
            .unwrap_or(default)
    }

    pub fn f64_param(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(Value::as_f64)
    }

    /// Normalized resource-locator parameter. `""` when unset.
    pub fn locator(&self, name: &str) -> String {
        normalize_locator(self.value(name))
    }

    /// Required identifier, accepted in either locator shape.
    pub fn required(&self, name: &str, label: &str) -> Result<String, ParameterError> {
        let id = self.locator(name);
        if id.is_empty() {
            return Err(ParameterError::new(format!("{label} is required")).with_field(name));
        }
        Ok(id)
    }

    /// Per-call options parsed from the `additionalOptions` parameter.
    pub fn call_options(&self) -> CallOptions {
        CallOptions::from_value(self.value("additionalOptions"))
    }

    /// The repeated custom-field group on updateRecord.
    ///
    /// Accepts a bare array or the `{"customField": [...]}` collection
    /// wrapper the host produces for repeated groups.
    pub fn custom_fields(&self, name: &str) -> Result<Vec<CustomFieldUpdate>, ParameterError> {
        let Some(raw) = self.value(name) else {
            return Ok(Vec::new());
        };
        let entries: &[Value] = match raw {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => match map.get("customField") {
                Some(Value::Array(items)) => items.as_slice(),
                Some(_) => {
                    return Err(
                        ParameterError::new("custom fields must be a list").with_field(name)
                    )
                }
                None => return Ok(Vec::new()),
            },
            Value::Null => return Ok(Vec::new()),
            _ => {
                return Err(ParameterError::new("custom fields must be a list").with_field(name))
            }
        };
        entries
            .iter()
            .map(|entry| {
                serde_json::from_value(entry.clone()).map_err(|err| {
                    ParameterError::new(format!("invalid custom field: {err}")).with_field(name)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::CustomFieldValue;

    #[test]
    fn bare_string_normalizes_to_itself() {
        assert_eq!(normalize_locator(Some(&json!("crm-113"))), "crm-113");
    }

    #[test]
    fn list_selection_normalizes_to_value() {
        let raw = json!({ "mode": "list", "value": "c1" });
        assert_eq!(normalize_locator(Some(&raw)), "c1");
    }

    #[test]
    fn malformed_locator_resolves_empty() {
        assert_eq!(normalize_locator(None), "");
        assert_eq!(normalize_locator(Some(&json!(42))), "");
        assert_eq!(normalize_locator(Some(&json!({ "mode": "list" }))), "");
    }

    #[test]
    fn required_rejects_empty_identifier() {
        let params = Parameters::from_value(json!({ "companyId": { "mode": "list", "value": "" } }));
        let err = params.required("companyId", "Company ID").unwrap_err();
        assert_eq!(err.to_string(), "Company ID is required");
        assert_eq!(err.field.as_deref(), Some("companyId"));
    }

    #[test]
    fn custom_fields_accepts_collection_wrapper() {
        let params = Parameters::from_value(json!({
            "customFields": {
                "customField": [
                    { "fieldId": "f1", "fieldType": "number", "numberValue": 42 }
                ]
            }
        }));
        let fields = params.custom_fields("customFields").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_id, "f1");
        assert_eq!(fields[0].value, CustomFieldValue::Number { number_value: 42.0 });
    }

    #[test]
    fn custom_fields_ignores_unrelated_value_subfields() {
        let params = Parameters::from_value(json!({
            "customFields": [
                {
                    "fieldId": "f1",
                    "fieldType": "checkbox",
                    "checkboxValue": true,
                    "textValue": "ignored"
                }
            ]
        }));
        let fields = params.custom_fields("customFields").unwrap();
        assert_eq!(
            fields[0].value,
            CustomFieldValue::Checkbox { checkbox_value: true }
        );
    }

    #[test]
    fn custom_fields_absent_is_empty() {
        let params = Parameters::default();
        assert!(params.custom_fields("customFields").unwrap().is_empty());
    }
}
