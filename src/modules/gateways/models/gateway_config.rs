use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use super::descriptor::ConfigSchema;

/// Gateway record as configured by the host
///
/// `endpoint` selects the adapter; `config` holds the provider credentials
/// and flags edited through the host's admin form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gateway {
    pub endpoint: String,

    #[sqlx(json)]
    pub config: GatewaySettings,

    pub is_active: bool,
}

impl Gateway {
    pub fn new(endpoint: impl Into<String>, config: GatewaySettings) -> Self {
        Self {
            endpoint: endpoint.into(),
            config,
            is_active: true,
        }
    }

    /// Sandbox unless `test_mode` is explicitly switched off
    pub fn environment(&self) -> GatewayEnvironment {
        if self.config.flag("test_mode", true) {
            GatewayEnvironment::Sandbox
        } else {
            GatewayEnvironment::Production
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl std::fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayEnvironment::Sandbox => write!(f, "sandbox"),
            GatewayEnvironment::Production => write!(f, "production"),
        }
    }
}

/// Free-form key/value gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewaySettings(Map<String, Value>);

impl GatewaySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Non-empty string value
    pub fn optional_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Non-empty string value, or a configuration error naming the key
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.optional_str(key)
            .ok_or_else(|| AppError::configuration(format!("gateway setting '{}' is not set", key)))
    }

    /// Boolean flag; admin forms store these as bools, numbers or strings
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ),
            _ => default,
        }
    }

    /// Add every schema key the stored configuration lacks
    pub fn merge_defaults(&mut self, schema: &ConfigSchema) {
        for (key, default) in schema {
            self.0
                .entry(key.to_string())
                .or_insert_with(|| default.clone());
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
