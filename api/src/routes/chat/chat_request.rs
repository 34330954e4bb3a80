use contextor::{MAX_QUERY_CHARS, Query};
use serde::Deserialize;
use serde_json::Value;

use crate::{core::http::error_envelope::ErrorDetail, middleware_layer::json_extractor::Validate};

/// Raw `POST /api/chat` body.
///
/// `query` is kept as a JSON value so that a missing field, a `null` and a
/// non-string each get their own error detail.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<Value>,
}

impl Validate for ChatRequest {
    type Valid = Query;

    fn validate(self) -> Result<Query, Vec<ErrorDetail>> {
        match self.query {
            None | Some(Value::Null) => Err(vec![ErrorDetail::body_field(
                Value::Null,
                "field required",
                "query",
            )]),
            Some(Value::String(s)) => {
                if s.chars().count() > MAX_QUERY_CHARS {
                    Err(vec![ErrorDetail::body_field(
                        Value::String(s),
                        format!("ensure this value has at most {MAX_QUERY_CHARS} characters"),
                        "query",
                    )])
                } else if s.trim().is_empty() {
                    Err(vec![ErrorDetail::body_field(
                        Value::String(s),
                        "query must not be empty",
                        "query",
                    )])
                } else {
                    Ok(Query { query: s })
                }
            }
            Some(other) => Err(vec![ErrorDetail::body_field(
                other,
                "query must be a string",
                "query",
            )]),
        }
    }
}
