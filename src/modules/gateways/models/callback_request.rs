use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

/// Inbound provider notification or payer return
///
/// Providers deliver their fields either in the query string or in a JSON or
/// form-encoded body; `input` looks in the body first, then the query.
#[derive(Debug, Clone, Default)]
pub struct CallbackRequest {
    query: HashMap<String, String>,
    body: Value,
}

impl CallbackRequest {
    pub fn new(query: HashMap<String, String>, body: Value) -> Self {
        Self { query, body }
    }

    pub fn from_query<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            Value::Null,
        )
    }

    pub fn from_json(body: Value) -> Self {
        Self::new(HashMap::new(), body)
    }

    /// Build from raw HTTP parts
    pub fn from_parts(query_string: &str, content_type: Option<&str>, body: &[u8]) -> Result<Self> {
        let query = url::form_urlencoded::parse(query_string.as_bytes())
            .into_owned()
            .collect();

        let body = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else if content_type.is_some_and(|ct| ct.contains("application/x-www-form-urlencoded")) {
            Value::Object(
                url::form_urlencoded::parse(body)
                    .into_owned()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect::<Map<_, _>>(),
            )
        } else {
            serde_json::from_slice(body)
                .map_err(|e| AppError::validation(format!("Callback body is not valid JSON: {}", e)))?
        };

        Ok(Self::new(query, body))
    }

    /// Scalar field as a string; empty values count as missing
    pub fn input(&self, key: &str) -> Option<String> {
        self.body
            .get(key)
            .and_then(scalar_to_string)
            .or_else(|| self.query.get(key).cloned())
            .filter(|v| !v.trim().is_empty())
    }

    /// Body merged with the query string, body fields winning
    pub fn all(&self) -> Value {
        let mut merged = match &self.body {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        for (key, value) in &self.query {
            merged
                .entry(key.clone())
                .or_insert_with(|| Value::String(value.clone()));
        }
        Value::Object(merged)
    }
}

/// Render a JSON scalar the way it was sent
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a JSON number or numeric string as an exact decimal
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
