//! Wire types for the `discoveryrule.*` API methods
//!
//! Zabbix encodes numeric fields as strings, so every scalar here is a
//! `String`. Fields the common code does not know about are kept in
//! [`LldRule::extra`] so concrete rule kinds can read and write them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator used to join preprocessor parameters on the wire
pub const PARAMS_SEPARATOR: &str = "\n";

/// One preprocessing step of a discovery rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preprocessor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub error_handler: String,
    #[serde(default)]
    pub error_handler_params: String,
}

/// Low-level discovery rule as exchanged with the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LldRule {
    #[serde(rename = "itemid", default, skip_serializing_if = "String::is_empty")]
    pub item_id: String,
    #[serde(rename = "hostid", default, skip_serializing_if = "String::is_empty")]
    pub host_id: String,
    #[serde(rename = "key_")]
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub delay: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(rename = "interfaceid", default, skip_serializing_if = "String::is_empty")]
    pub interface_id: String,
    #[serde(rename = "preprocessing", default)]
    pub preprocessors: Vec<Preprocessor>,
    /// Kind-specific fields (`snmp_oid`, ...) and anything else the server returns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LldRule {
    /// Read a kind-specific string field
    pub fn extra_str(&self, field: &str) -> &str {
        self.extra.get(field).and_then(|v| v.as_str()).unwrap_or("")
    }
}
