//! Zabbix Client
//!
//! JSON-RPC client for the Zabbix frontend API, combining the configured
//! endpoint, API token and HTTP transport.

use super::api::LldApi;
use super::http::JsonRpcHttp;
use super::types::LldRule;
use crate::config::ApiConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Main Zabbix client
#[derive(Clone)]
pub struct ZabbixClient {
    pub http: JsonRpcHttp,
    endpoint: String,
    token: Option<String>,
    next_id: Arc<AtomicU64>,
}

impl ZabbixClient {
    /// Create a new client from API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let http = JsonRpcHttp::new(Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            token: config.token.clone(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Resolved `api_jsonrpc.php` URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Invoke a JSON-RPC method and return its `result` member
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        tracing::trace!("{} request: {}", method, request);

        let response = self
            .http
            .post(&self.endpoint, self.token.as_deref(), &request)
            .await
            .with_context(|| format!("{} failed", method))?;

        if let Some(error) = response.get("error") {
            return Err(rpc_error(error));
        }

        response
            .get("result")
            .cloned()
            .with_context(|| format!("{} response has no result", method))
    }
}

/// Build an error from a JSON-RPC `error` member
fn rpc_error(error: &Value) -> anyhow::Error {
    let code = error.get("code").and_then(|v| v.as_i64()).unwrap_or(0);
    let message = error
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown error");

    match error.get("data").and_then(|v| v.as_str()) {
        Some(data) if !data.is_empty() => {
            anyhow::anyhow!("Zabbix API error {}: {} {}", code, message, data)
        }
        _ => anyhow::anyhow!("Zabbix API error {}: {}", code, message),
    }
}

/// Extract the identifier list from a create/delete result
fn result_ids(result: &Value, member: &str) -> Result<Vec<String>> {
    let ids = result
        .get(member)
        .and_then(|v| v.as_array())
        .with_context(|| format!("response is missing '{}'", member))?;

    ids.iter()
        .map(|id| match id {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(anyhow::anyhow!("unexpected id in '{}': {}", member, other)),
        })
        .collect()
}

#[async_trait]
impl LldApi for ZabbixClient {
    async fn rules_create(&self, rules: &mut [LldRule]) -> Result<()> {
        let params = serde_json::to_value(&*rules).context("Failed to encode discovery rules")?;
        let result = self.call("discoveryrule.create", params).await?;
        let ids = result_ids(&result, "itemids")?;

        if ids.len() != rules.len() {
            return Err(anyhow::anyhow!(
                "discoveryrule.create returned {} ids for {} rules",
                ids.len(),
                rules.len()
            ));
        }

        for (rule, id) in rules.iter_mut().zip(ids) {
            rule.item_id = id;
        }
        Ok(())
    }

    async fn rules_update(&self, rules: &[LldRule]) -> Result<()> {
        let params = serde_json::to_value(rules).context("Failed to encode discovery rules")?;
        self.call("discoveryrule.update", params).await?;
        Ok(())
    }

    async fn rules_get(&self, params: Value) -> Result<Vec<LldRule>> {
        let result = self.call("discoveryrule.get", params).await?;
        serde_json::from_value(result).context("Failed to decode discovery rules")
    }

    async fn rules_delete_by_ids(&self, ids: &[String]) -> Result<()> {
        let result = self.call("discoveryrule.delete", json!(ids)).await?;
        let deleted = result_ids(&result, "ruleids")?;
        tracing::debug!("deleted discovery rules: {:?}", deleted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_includes_data() {
        let err = rpc_error(&json!({
            "code": -32602,
            "message": "Invalid params.",
            "data": "No permissions to referred object or it does not exist!"
        }));
        assert_eq!(
            err.to_string(),
            "Zabbix API error -32602: Invalid params. No permissions to referred object or it does not exist!"
        );
    }

    #[test]
    fn test_rpc_error_without_data() {
        let err = rpc_error(&json!({"code": -32500, "message": "Application error.", "data": ""}));
        assert_eq!(err.to_string(), "Zabbix API error -32500: Application error.");
    }

    #[test]
    fn test_result_ids_accepts_numbers_and_strings() {
        let ids = result_ids(&json!({"itemids": ["101", 102]}), "itemids").unwrap();
        assert_eq!(ids, vec!["101".to_string(), "102".to_string()]);
    }

    #[test]
    fn test_result_ids_missing_member() {
        assert!(result_ids(&json!({}), "ruleids").is_err());
    }

    #[test]
    fn test_client_resolves_endpoint() {
        let config = ApiConfig {
            url: "https://zabbix.example.com/zabbix".to_string(),
            ..Default::default()
        };
        let client = ZabbixClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://zabbix.example.com/zabbix/api_jsonrpc.php"
        );
    }
}
