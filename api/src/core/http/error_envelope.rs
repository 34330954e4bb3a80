use serde::Serialize;
use serde_json::Value;

/// One entry of the `errors` array returned for 4xx/5xx responses.
///
/// `param` and `location` serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    /// Offending value (the submitted field, or a short marker).
    pub value: Value,
    /// Human-readable message.
    pub msg: String,
    /// Field or header name.
    pub param: Option<String>,
    /// Where the value came from: `body` or `header`.
    pub location: Option<String>,
}

impl ErrorDetail {
    /// A problem with a field of the JSON body.
    pub fn body_field(value: Value, msg: impl Into<String>, param: &str) -> Self {
        Self {
            value,
            msg: msg.into(),
            param: Some(param.to_string()),
            location: Some("body".into()),
        }
    }

    /// The body was not a JSON object at all.
    pub fn unparseable_body() -> Self {
        Self::body_field(
            Value::String("could not parse body".into()),
            "Request body must be a valid JSON object",
            "invalid",
        )
    }

    /// Bad or missing `Authorization` header.
    pub fn auth(token: Option<String>, msg: impl Into<String>) -> Self {
        Self {
            value: token.map(Value::String).unwrap_or(Value::Null),
            msg: msg.into(),
            param: Some("Authorization".into()),
            location: Some("header".into()),
        }
    }

    /// Generic server failure; never carries internal details.
    pub fn server() -> Self {
        Self {
            value: Value::String("Server error".into()),
            msg: "Internal Server Error".into(),
            param: None,
            location: None,
        }
    }
}

/// `{"errors": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorDetail>,
}
