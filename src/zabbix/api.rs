//! Boundary between the discovery rule lifecycle and the remote API

use super::types::LldRule;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Discovery rule calls the lifecycle needs from an API client.
///
/// Each call is a single attempt; timeouts and transport concerns belong to
/// the implementation.
#[async_trait]
pub trait LldApi: Send + Sync {
    /// Create rules, assigning each `item_id` in place
    async fn rules_create(&self, rules: &mut [LldRule]) -> Result<()>;

    /// Update rules identified by their `item_id`
    async fn rules_update(&self, rules: &[LldRule]) -> Result<()>;

    /// Query rules with raw `discoveryrule.get` parameters
    async fn rules_get(&self, params: Value) -> Result<Vec<LldRule>>;

    /// Delete rules by identifier
    async fn rules_delete_by_ids(&self, ids: &[String]) -> Result<()>;
}
