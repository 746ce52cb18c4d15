//! Concrete discovery rule kinds
//!
//! Each kind is a customizer over [`LldResource`]; they differ only in the
//! item type code and the few wire fields that type needs.

use super::data::ResourceData;
use super::lld::{LldCustomizer, LldResource};
use super::schema::{Field, Schema, Validator};
use crate::zabbix::types::LldRule;

/// Zabbix item type codes
pub const TYPE_AGENT: &str = "0";
pub const TYPE_INTERNAL: &str = "5";
pub const TYPE_AGENT_ACTIVE: &str = "7";
pub const TYPE_SNMP: &str = "20";

fn interface_field() -> Field {
    Field::string("interfaceid")
        .default_value("0")
        .describe("Host Interface ID")
}

fn submit_interface(data: &ResourceData, rule: &mut LldRule) {
    rule.interface_id = data.get_str("interfaceid").to_string();
}

fn read_interface(data: &mut ResourceData, rule: &LldRule) {
    data.set("interfaceid", rule.interface_id.clone());
}

/// Passive Zabbix agent discovery
pub struct AgentLld;

impl LldCustomizer for AgentLld {
    fn extend_schema(&self, schema: &mut Schema) {
        schema.insert(interface_field());
    }

    fn before_submit(&self, data: &ResourceData, rule: &mut LldRule) {
        rule.kind = TYPE_AGENT.to_string();
        submit_interface(data, rule);
    }

    fn after_read(&self, data: &mut ResourceData, rule: &LldRule) {
        read_interface(data, rule);
    }
}

/// Active Zabbix agent discovery; the agent connects in, so no interface
pub struct AgentActiveLld;

impl LldCustomizer for AgentActiveLld {
    fn before_submit(&self, _data: &ResourceData, rule: &mut LldRule) {
        rule.kind = TYPE_AGENT_ACTIVE.to_string();
    }

    fn after_read(&self, _data: &mut ResourceData, _rule: &LldRule) {}
}

/// Zabbix internal discovery
pub struct InternalLld;

impl LldCustomizer for InternalLld {
    fn before_submit(&self, _data: &ResourceData, rule: &mut LldRule) {
        rule.kind = TYPE_INTERNAL.to_string();
    }

    fn after_read(&self, _data: &mut ResourceData, _rule: &LldRule) {}
}

/// SNMP agent discovery, walking `snmp_oid` through a host interface
pub struct SnmpLld;

impl LldCustomizer for SnmpLld {
    fn extend_schema(&self, schema: &mut Schema) {
        schema.insert(interface_field());
        schema.insert(
            Field::string("snmp_oid")
                .required()
                .validate(Validator::NotWhitespace)
                .describe("SNMP OID"),
        );
    }

    fn before_submit(&self, data: &ResourceData, rule: &mut LldRule) {
        rule.kind = TYPE_SNMP.to_string();
        submit_interface(data, rule);
        rule.extra
            .insert("snmp_oid".to_string(), data.get_str("snmp_oid").into());
    }

    fn after_read(&self, data: &mut ResourceData, rule: &LldRule) {
        read_interface(data, rule);
        data.set("snmp_oid", rule.extra_str("snmp_oid").to_string());
    }
}

pub fn agent() -> LldResource<AgentLld> {
    LldResource::new(AgentLld)
}

pub fn agent_active() -> LldResource<AgentActiveLld> {
    LldResource::new(AgentActiveLld)
}

pub fn internal() -> LldResource<InternalLld> {
    LldResource::new(InternalLld)
}

pub fn snmp() -> LldResource<SnmpLld> {
    LldResource::new(SnmpLld)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LldError;
    use crate::resource::testing::FakeApi;
    use serde_json::json;

    fn base() -> serde_json::Value {
        json!({
            "hostid": "10105",
            "key": "net.if.discovery",
            "name": "Network interface discovery",
            "delay": "1h"
        })
    }

    #[tokio::test]
    async fn test_agent_sets_type_and_default_interface() {
        let api = FakeApi::default();
        let resource = agent();
        let mut data = ResourceData::from_value(base()).unwrap();

        resource.create(&mut data, &api).await.unwrap();

        let stored = api.stored(data.id()).unwrap();
        assert_eq!(stored.kind, TYPE_AGENT);
        assert_eq!(stored.interface_id, "0");
        assert_eq!(data.get_str("interfaceid"), "0");
    }

    #[tokio::test]
    async fn test_agent_active_has_no_interface() {
        let api = FakeApi::default();
        let resource = agent_active();
        let mut data = ResourceData::from_value(base()).unwrap();

        resource.create(&mut data, &api).await.unwrap();

        let stored = api.stored(data.id()).unwrap();
        assert_eq!(stored.kind, TYPE_AGENT_ACTIVE);
        assert_eq!(stored.interface_id, "");
        assert!(resource.schema().field("interfaceid").is_none());
    }

    #[tokio::test]
    async fn test_internal_sets_type() {
        let api = FakeApi::default();
        let mut data = ResourceData::from_value(base()).unwrap();

        internal().create(&mut data, &api).await.unwrap();

        assert_eq!(api.stored(data.id()).unwrap().kind, TYPE_INTERNAL);
    }

    #[tokio::test]
    async fn test_snmp_round_trips_oid_and_interface() {
        let api = FakeApi::default();
        let resource = snmp();
        let mut attrs = base();
        attrs["interfaceid"] = json!("12");
        attrs["snmp_oid"] = json!("discovery[{#IFNAME},1.3.6.1.2.1.31.1.1.1.1]");
        let mut data = ResourceData::from_value(attrs).unwrap();

        resource.create(&mut data, &api).await.unwrap();

        let stored = api.stored(data.id()).unwrap();
        assert_eq!(stored.kind, TYPE_SNMP);
        assert_eq!(stored.interface_id, "12");
        assert_eq!(
            stored.extra_str("snmp_oid"),
            "discovery[{#IFNAME},1.3.6.1.2.1.31.1.1.1.1]"
        );
        assert_eq!(
            data.get_str("snmp_oid"),
            "discovery[{#IFNAME},1.3.6.1.2.1.31.1.1.1.1]"
        );
        assert_eq!(data.get_str("interfaceid"), "12");
    }

    #[tokio::test]
    async fn test_snmp_requires_oid() {
        let api = FakeApi::default();
        let mut data = ResourceData::from_value(base()).unwrap();

        let err = snmp().create(&mut data, &api).await.unwrap_err();

        assert!(matches!(err, LldError::Validation(_)));
        assert!(err.to_string().contains("snmp_oid: required attribute is missing"));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_agent_schema_rejects_unknown_kind_fields() {
        let mut attrs = base();
        attrs["snmp_oid"] = json!("1.3.6");
        let mut data = ResourceData::from_value(attrs).unwrap();
        let resource = agent();

        resource.schema().apply_defaults(&mut data);
        assert!(resource.schema().validate(&data).is_err());
    }
}
