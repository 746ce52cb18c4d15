//! In-memory `LldApi` used by unit tests

use crate::zabbix::api::LldApi;
use crate::zabbix::types::LldRule;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// Fake server: assigns ids from 1001, keeps rules in memory, records calls
pub(crate) struct FakeApi {
    rules: Mutex<Vec<LldRule>>,
    calls: Mutex<Vec<&'static str>>,
    get_params: Mutex<Vec<Value>>,
    updates: Mutex<Vec<LldRule>>,
    deleted: Mutex<Vec<Vec<String>>>,
    next_id: AtomicU64,
    duplicate: AtomicBool,
    fail_on: Option<&'static str>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            get_params: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1001),
            duplicate: AtomicBool::new(false),
            fail_on: None,
        }
    }
}

impl FakeApi {
    /// Fake whose `call` ("create", "update", "get", "delete") always errors
    pub fn failing(call: &'static str) -> Self {
        Self {
            fail_on: Some(call),
            ..Default::default()
        }
    }

    /// Make `rules_get` return every match twice
    pub fn duplicate_results(&self, on: bool) {
        self.duplicate.store(on, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_params(&self) -> Vec<Value> {
        self.get_params.lock().unwrap().clone()
    }

    pub fn last_update(&self) -> Option<LldRule> {
        self.updates.lock().unwrap().last().cloned()
    }

    pub fn deleted_ids(&self) -> Vec<Vec<String>> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn stored(&self, id: &str) -> Option<LldRule> {
        self.rules
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.item_id == id)
            .cloned()
    }

    fn enter(&self, call: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_on {
            Some(failing) if failing == call => {
                Err(anyhow::anyhow!("discoveryrule.{} rejected", call))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl LldApi for FakeApi {
    async fn rules_create(&self, rules: &mut [LldRule]) -> Result<()> {
        self.enter("create")?;
        let mut store = self.rules.lock().unwrap();
        for rule in rules.iter_mut() {
            rule.item_id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
            store.push(rule.clone());
        }
        Ok(())
    }

    async fn rules_update(&self, rules: &[LldRule]) -> Result<()> {
        self.enter("update")?;
        let mut store = self.rules.lock().unwrap();
        for rule in rules {
            self.updates.lock().unwrap().push(rule.clone());
            let existing = store
                .iter_mut()
                .find(|r| r.item_id == rule.item_id)
                .ok_or_else(|| anyhow::anyhow!("No permissions to referred object or it does not exist!"))?;
            let host_id = std::mem::take(&mut existing.host_id);
            *existing = rule.clone();
            existing.host_id = host_id;
        }
        Ok(())
    }

    async fn rules_get(&self, params: Value) -> Result<Vec<LldRule>> {
        self.get_params.lock().unwrap().push(params.clone());
        self.enter("get")?;

        let ids: Vec<&str> = params["itemids"]
            .as_array()
            .map(|ids| ids.iter().filter_map(|id| id.as_str()).collect())
            .unwrap_or_default();

        let found: Vec<LldRule> = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.item_id.as_str()))
            .cloned()
            .collect();

        if self.duplicate.load(Ordering::SeqCst) {
            Ok(found.iter().chain(found.iter()).cloned().collect())
        } else {
            Ok(found)
        }
    }

    async fn rules_delete_by_ids(&self, ids: &[String]) -> Result<()> {
        self.deleted.lock().unwrap().push(ids.to_vec());
        self.enter("delete")?;
        self.rules
            .lock()
            .unwrap()
            .retain(|r| !ids.contains(&r.item_id));
        Ok(())
    }
}
