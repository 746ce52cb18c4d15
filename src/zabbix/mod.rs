//! Zabbix API interaction module
//!
//! # Module Structure
//!
//! - [`api`] - The [`LldApi`](api::LldApi) trait the resource lifecycle calls
//! - [`client`] - JSON-RPC client implementing it
//! - [`http`] - HTTP transport for JSON-RPC envelopes
//! - [`types`] - Wire types for discovery rules and preprocessors
//!
//! # Example
//!
//! ```ignore
//! use zabbix_lld::config::ApiConfig;
//! use zabbix_lld::zabbix::client::ZabbixClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ZabbixClient::new(&ApiConfig::load()?)?;
//!     let version = client.call("apiinfo.version", serde_json::json!([])).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod http;
pub mod types;
