//! Zabbix low-level discovery rules as declarative resources
//!
//! Validates a discovery rule record, turns it into a `discoveryrule.*` API
//! payload, runs create/read/update/delete through an [`LldApi`] client and
//! writes the server state back into the record.
//!
//! - [`resource`] - Schema, record, builder/flattener and lifecycle
//! - [`zabbix`] - API boundary trait, JSON-RPC client and wire types
//! - [`config`] - API connection settings
//! - [`logging`] - Optional file log setup

pub mod config;
pub mod error;
pub mod logging;
pub mod resource;
pub mod zabbix;

pub use error::{FieldError, LldError, Result};
pub use resource::{LldCustomizer, LldResource, ResourceData};
pub use zabbix::api::LldApi;
pub use zabbix::client::ZabbixClient;
pub use zabbix::types::{LldRule, Preprocessor};
