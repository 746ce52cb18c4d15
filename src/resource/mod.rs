//! Resource abstraction layer
//!
//! This module maps discovery rule resource records onto Zabbix API calls.
//!
//! # Architecture
//!
//! - [`data`] - The resource record handed over by the driver
//! - [`schema`] - Declarative attribute descriptors, defaults and validation
//! - [`lld`] - Payload builder, flattener and the shared CRUD lifecycle
//! - [`kinds`] - Concrete rule kinds (agent, active agent, internal, SNMP)
//!
//! # Example
//!
//! ```ignore
//! use zabbix_lld::resource::{kinds, ResourceData};
//! use zabbix_lld::zabbix::client::ZabbixClient;
//!
//! async fn apply(client: &ZabbixClient, config: serde_json::Value) -> zabbix_lld::Result<()> {
//!     let mut data = ResourceData::from_value(config)?;
//!     kinds::agent().create(&mut data, client).await
//! }
//! ```

pub mod data;
pub mod kinds;
pub mod lld;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

pub use data::ResourceData;
pub use lld::{
    build_rule, expand_preprocessors, flatten_preprocessors, FnCustomizer, LldCustomizer,
    LldResource,
};
pub use schema::{Field, FieldKind, Presence, Schema, Validator};
