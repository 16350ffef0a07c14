//! Core data model shared across operations, resolvers and the client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::locator::Parameters;
use crate::DEFAULT_REQUEST_TIMEOUT;

/// API token pair stored by the host's credential vault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub token_id: String,
    pub token_secret: String,
}

impl Credentials {
    pub fn new(token_id: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            token_secret: token_secret.into(),
        }
    }
}

/// Per-call options from the `additionalOptions` parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CallOptions {
    /// Request timeout in milliseconds.
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,
    /// Return the full GraphQL envelope instead of just `data`.
    pub full_response: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            full_response: false,
        }
    }
}

impl CallOptions {
    /// Parse from the raw parameter value; anything malformed falls back to
    /// the defaults.
    pub fn from_value(raw: Option<&Value>) -> Self {
        raw.and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Everything an operation may read while processing one input item.
///
/// Created fresh per item and dropped when the item completes; nothing in
/// here outlives the host loop's iteration.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub item_index: usize,
    pub credentials: Credentials,
    pub params: Parameters,
    pub options: CallOptions,
}

impl OperationContext {
    pub fn new(item_index: usize, credentials: Credentials, params: Parameters) -> Self {
        let options = params.call_options();
        Self {
            item_index,
            credentials,
            params,
            options,
        }
    }
}

/// Outcome of a single operation, as handed back to the host loop.
///
/// Exactly one of `data`/`error` is meaningful depending on `success`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// One input row for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchItem {
    pub operation: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl BatchItem {
    pub fn new(operation: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            operation: operation.into(),
            parameters,
        }
    }
}

/// One custom-field assignment on updateRecord.
///
/// The wire shape is discriminated by `fieldType`; only the sub-fields of
/// the declared variant are read, extra keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldUpdate {
    pub field_id: String,
    #[serde(flatten)]
    pub value: CustomFieldValue,
}

/// Typed value payload of a custom-field update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "fieldType", rename_all = "camelCase")]
pub enum CustomFieldValue {
    #[serde(rename_all = "camelCase")]
    Text { text_value: String },
    #[serde(rename_all = "camelCase")]
    Number { number_value: f64 },
    /// Comma-separated option ids, as entered in the host UI.
    #[serde(rename_all = "camelCase")]
    Selection { selection_ids: String },
    #[serde(rename_all = "camelCase")]
    Checkbox { checkbox_value: bool },
    #[serde(rename_all = "camelCase")]
    Phone {
        phone_number: String,
        #[serde(default)]
        region_code: String,
    },
    #[serde(rename_all = "camelCase")]
    Location {
        #[serde(default)]
        latitude: f64,
        #[serde(default)]
        longitude: f64,
        #[serde(default)]
        location_text: String,
    },
    /// Comma-separated ISO country codes.
    #[serde(rename_all = "camelCase")]
    Countries {
        country_codes: String,
        #[serde(default)]
        countries_text: String,
    },
}

/// One row of a searchable dropdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchItem {
    pub label: String,
    pub id: String,
}

impl SearchItem {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }

    /// Instructional or error row with no selectable id.
    pub(crate) fn sentinel(label: impl Into<String>) -> Self {
        Self::new(label, "")
    }
}
