use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Configuration keys an adapter needs, with the defaults the admin form starts from
pub type ConfigSchema = BTreeMap<&'static str, Value>;

/// How the payer is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// One-off payment
    Once,
}

/// Static adapter metadata listed in the host's admin UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterDescriptor {
    pub driver: &'static str,

    #[serde(rename = "type")]
    pub kind: PaymentKind,

    pub endpoint: &'static str,

    pub refund_support: bool,

    /// Host template used to edit this gateway's settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<&'static str>,
}
