//! Low-level discovery rule lifecycle
//!
//! Common schema, payload builder, flattener and the CRUD sequence shared by
//! every discovery rule kind. Kinds differ only in a few wire fields, which
//! they contribute through an [`LldCustomizer`].

use super::data::ResourceData;
use super::schema::{Field, Schema, Validator};
use crate::error::{LldError, Result};
use crate::zabbix::api::LldApi;
use crate::zabbix::types::{LldRule, Preprocessor, PARAMS_SEPARATOR};
use serde_json::{json, Value};

/// Attribute holding the repeated preprocessor blocks
pub const PREPROCESSOR_BLOCK: &str = "preprocessor";

/// Fields of one preprocessor block
pub fn preprocessor_fields() -> Vec<Field> {
    vec![
        Field::string("id").computed(),
        Field::string("type")
            .required()
            .validate(Validator::Numeric)
            .describe("Preprocessor type, zabbix identifier number"),
        Field::string_list("params")
            .validate(Validator::NotWhitespace)
            .describe("Preprocessor parameters"),
        Field::string("error_handler").default_value(""),
        Field::string("error_handler_params").default_value(""),
    ]
}

/// Attributes common to every discovery rule kind
pub fn lld_schema() -> Schema {
    Schema::new(vec![
        Field::string("hostid")
            .required()
            .force_new()
            .validate(Validator::Numeric)
            .describe("Host ID"),
        Field::string("delay")
            .default_value("3600")
            .validate(Validator::NotWhitespace)
            .describe("LLD Delay period"),
        Field::string("key")
            .required()
            .validate(Validator::NotWhitespace)
            .describe("LLD KEY"),
        Field::string("name")
            .required()
            .validate(Validator::NotWhitespace)
            .describe("LLD Name"),
        Field::blocks(PREPROCESSOR_BLOCK, preprocessor_fields()),
    ])
}

/// Build the base rule object from a record
pub fn build_rule(data: &ResourceData) -> LldRule {
    LldRule {
        key: data.get_str("key").to_string(),
        host_id: data.get_str("hostid").to_string(),
        name: data.get_str("name").to_string(),
        delay: data.get_str("delay").to_string(),
        preprocessors: expand_preprocessors(data),
        ..Default::default()
    }
}

/// Expand preprocessor blocks into wire objects, joining params with the separator
pub fn expand_preprocessors(data: &ResourceData) -> Vec<Preprocessor> {
    data.get_list(PREPROCESSOR_BLOCK)
        .iter()
        .map(|block| {
            let field = |name: &str| {
                block
                    .get(name)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string()
            };
            let params: Vec<&str> = block
                .get("params")
                .and_then(|v| v.as_array())
                .map(|items| items.iter().filter_map(|p| p.as_str()).collect())
                .unwrap_or_default();

            Preprocessor {
                kind: field("type"),
                params: params.join(PARAMS_SEPARATOR),
                error_handler: field("error_handler"),
                error_handler_params: field("error_handler_params"),
            }
        })
        .collect()
}

/// Flatten wire preprocessors back into record blocks, in order.
///
/// Params are split on the separator, so a parameter that itself contained
/// a newline comes back as several entries.
pub fn flatten_preprocessors(rule: &LldRule) -> Vec<Value> {
    rule.preprocessors
        .iter()
        .map(|p| {
            let params: Vec<&str> = if p.params.is_empty() {
                Vec::new()
            } else {
                p.params.split(PARAMS_SEPARATOR).collect()
            };

            json!({
                "type": p.kind,
                "params": params,
                "error_handler": p.error_handler,
                "error_handler_params": p.error_handler_params,
            })
        })
        .collect()
}

/// Per-kind hooks around the shared lifecycle
pub trait LldCustomizer: Send + Sync {
    /// Add kind-specific attributes to the common schema
    fn extend_schema(&self, _schema: &mut Schema) {}

    /// Inject kind-specific fields into the rule before create/update
    fn before_submit(&self, data: &ResourceData, rule: &mut LldRule);

    /// Copy kind-specific fields from a fetched rule into the record
    fn after_read(&self, data: &mut ResourceData, rule: &LldRule);
}

/// Customizer built from a plain function pair, plus the attributes the pair reads and writes
pub struct FnCustomizer<B, A> {
    before: B,
    after: A,
    fields: Vec<Field>,
}

impl<B, A> FnCustomizer<B, A>
where
    B: Fn(&ResourceData, &mut LldRule) + Send + Sync,
    A: Fn(&mut ResourceData, &LldRule) + Send + Sync,
{
    pub fn new(before: B, after: A) -> Self {
        Self {
            before,
            after,
            fields: Vec::new(),
        }
    }

    /// Attributes added to the common schema
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }
}

impl<B, A> LldCustomizer for FnCustomizer<B, A>
where
    B: Fn(&ResourceData, &mut LldRule) + Send + Sync,
    A: Fn(&mut ResourceData, &LldRule) + Send + Sync,
{
    fn extend_schema(&self, schema: &mut Schema) {
        for field in &self.fields {
            schema.insert(field.clone());
        }
    }

    fn before_submit(&self, data: &ResourceData, rule: &mut LldRule) {
        (self.before)(data, rule)
    }

    fn after_read(&self, data: &mut ResourceData, rule: &LldRule) {
        (self.after)(data, rule)
    }
}

/// Discovery rule resource: the common CRUD sequence parameterized by a customizer
pub struct LldResource<C> {
    schema: Schema,
    customizer: C,
}

impl<C: LldCustomizer> LldResource<C> {
    pub fn new(customizer: C) -> Self {
        let mut schema = lld_schema();
        customizer.extend_schema(&mut schema);
        Self { schema, customizer }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Apply defaults and validate; runs before any API call.
    ///
    /// The record only receives the defaults once it passes validation.
    fn prepare(&self, data: &mut ResourceData) -> Result<()> {
        let mut candidate = data.clone();
        self.schema.apply_defaults(&mut candidate);
        self.schema.validate(&candidate)?;
        *data = candidate;
        Ok(())
    }

    /// Create the rule and resynchronize the record from the server
    pub async fn create(&self, data: &mut ResourceData, api: &dyn LldApi) -> Result<()> {
        self.prepare(data)?;

        let mut rule = build_rule(data);
        self.customizer.before_submit(data, &mut rule);

        tracing::trace!("preparing lld object for create/update: {:?}", rule);

        let mut rules = [rule];
        api.rules_create(&mut rules).await?;

        let [created] = rules;
        tracing::trace!("created lld: {:?}", created);

        data.set_id(created.item_id);
        self.read(data, api).await
    }

    /// Update the rule in place and resynchronize the record from the server
    pub async fn update(&self, data: &mut ResourceData, api: &dyn LldApi) -> Result<()> {
        self.prepare(data)?;

        let mut rule = build_rule(data);
        rule.item_id = data.id().to_string();
        // Host is immutable; the follow-up read restores the server's value
        rule.host_id.clear();
        self.customizer.before_submit(data, &mut rule);

        tracing::trace!("preparing lld object for create/update: {:?}", rule);

        api.rules_update(&[rule]).await?;

        self.read(data, api).await
    }

    /// Refresh the record from the server.
    ///
    /// No match clears the identifier; more than one is an error and leaves
    /// the record untouched. A record without identifier is left as is.
    pub async fn read(&self, data: &mut ResourceData, api: &dyn LldApi) -> Result<()> {
        if data.id().is_empty() {
            tracing::debug!("lld has no id, skipping lookup");
            return Ok(());
        }

        tracing::debug!("Lookup of lld with id {}", data.id());

        let mut rules = api
            .rules_get(json!({
                "itemids": [data.id()],
                "selectPreprocessing": "extend",
            }))
            .await?;

        if rules.is_empty() {
            tracing::debug!("lld {} not found, clearing id", data.id());
            data.set_id("");
            return Ok(());
        }
        if rules.len() > 1 {
            return Err(LldError::Ambiguous {
                id: data.id().to_string(),
                count: rules.len(),
            });
        }
        let rule = rules.remove(0);

        tracing::debug!("Got lld: {:?}", rule);

        data.set_id(rule.item_id.clone());
        data.set("hostid", rule.host_id.clone());
        data.set("key", rule.key.clone());
        data.set("name", rule.name.clone());
        data.set("delay", rule.delay.clone());
        data.set(PREPROCESSOR_BLOCK, flatten_preprocessors(&rule));

        self.customizer.after_read(data, &rule);

        Ok(())
    }

    /// Delete the rule; API errors are returned unchanged
    pub async fn delete(&self, data: &mut ResourceData, api: &dyn LldApi) -> Result<()> {
        api.rules_delete_by_ids(&[data.id().to_string()]).await?;
        data.set_id("");
        Ok(())
    }
}
