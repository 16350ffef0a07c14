//! GraphQL response envelope and the pure response normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::GraphQLError;

/// Standard `{data, errors}` wrapper returned by the endpoint.
///
/// Keys beyond `data`/`errors` (extensions and friends) are preserved so a
/// full-response passthrough loses nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphQLEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLErrorEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphQLEnvelope {
    /// Envelope carrying only data, as a healthy endpoint returns it.
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    /// Envelope carrying only error messages.
    pub fn with_errors(messages: Vec<String>) -> Self {
        Self {
            errors: messages
                .into_iter()
                .map(|message| GraphQLErrorEntry { message })
                .collect(),
            ..Default::default()
        }
    }
}

/// One entry of the `errors` sequence. Anything past `message` is dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphQLErrorEntry {
    pub message: String,
}

/// Inspect an envelope and extract its payload.
///
/// A non-empty `errors` sequence is always a failure, whatever `data`
/// holds; the resulting [`GraphQLError`] joins every server message. On
/// success the caller gets `data` (JSON `null` when absent), or the whole
/// envelope when `full_response` is set.
pub fn normalize(envelope: GraphQLEnvelope, full_response: bool) -> Result<Value, GraphQLError> {
    if !envelope.errors.is_empty() {
        let messages = envelope
            .errors
            .into_iter()
            .map(|entry| entry.message)
            .collect();
        return Err(GraphQLError::new(messages));
    }
    if full_response {
        return Ok(serde_json::to_value(&envelope).unwrap_or(Value::Null));
    }
    Ok(envelope.data.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn errors_always_fail_even_with_data() {
        let envelope = GraphQLEnvelope {
            data: Some(json!({ "x": 1 })),
            errors: vec![
                GraphQLErrorEntry { message: "A".into() },
                GraphQLErrorEntry { message: "B".into() },
            ],
            extra: Default::default(),
        };
        let err = normalize(envelope.clone(), false).unwrap_err();
        assert_eq!(err.to_string(), "A, B");
        let err = normalize(envelope, true).unwrap_err();
        assert_eq!(err.to_string(), "A, B");
    }

    #[test]
    fn data_unwrapped_by_default() {
        let envelope = GraphQLEnvelope::with_data(json!({ "x": 1 }));
        assert_eq!(normalize(envelope, false).unwrap(), json!({ "x": 1 }));
    }

    #[test]
    fn full_response_returns_whole_envelope() {
        let envelope: GraphQLEnvelope =
            serde_json::from_value(json!({ "data": { "x": 1 }, "extensions": { "cost": 2 } }))
                .unwrap();
        assert_eq!(
            normalize(envelope, true).unwrap(),
            json!({ "data": { "x": 1 }, "extensions": { "cost": 2 } })
        );
    }

    #[test]
    fn missing_data_normalizes_to_null() {
        let envelope = GraphQLEnvelope::default();
        assert_eq!(normalize(envelope, false).unwrap(), Value::Null);
    }

    #[test]
    fn unknown_error_keys_are_tolerated() {
        let envelope: GraphQLEnvelope = serde_json::from_value(json!({
            "errors": [{ "message": "denied", "path": ["companyList"], "locations": [] }]
        }))
        .unwrap();
        assert_eq!(normalize(envelope, false).unwrap_err().to_string(), "denied");
    }
}
