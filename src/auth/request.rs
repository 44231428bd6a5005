//! Request-like input read by strategies.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// The parts of an HTTP request a strategy reads: the parsed body and the
/// query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthRequest {
    pub body: Option<Value>,
    pub query: HashMap<String, String>,
}

impl AuthRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replace the whole query map, e.g. with one a web framework already parsed.
    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Build the request from a raw query string such as `username=u1&password=p1`.
    pub fn from_query_string(query: &str) -> Self {
        Self {
            body: None,
            query: parse_urlencoded(query.as_bytes()),
        }
    }

    /// Look up a credential field, first in the body, then in the query.
    ///
    /// Missing and empty values count as absent, so an empty body field
    /// falls through to the query string.
    pub fn credential(&self, field: &str) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|body| body.get(field))
            .and_then(credential_value)
            .or_else(|| {
                self.query
                    .get(field)
                    .filter(|value| !value.is_empty())
                    .cloned()
            })
    }
}

fn credential_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Decode `application/x-www-form-urlencoded` data. The first occurrence of a
/// repeated key wins.
pub(crate) fn parse_urlencoded(input: &[u8]) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(input).into_owned() {
        fields.entry(key).or_insert(value);
    }
    fields
}

/// Decode a form body into a JSON object of strings.
pub(crate) fn form_to_json(input: &[u8]) -> Value {
    let object: Map<String, Value> = parse_urlencoded(input)
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Value::Object(object)
}
