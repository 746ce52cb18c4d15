//! Declarative attribute schema
//!
//! A [`Schema`] describes the attributes a resource record may carry: their
//! shape, whether they are required, optional or server-computed, defaults,
//! value rules, and whether changing them forces a new resource.

use super::data::ResourceData;
use crate::error::{FieldError, LldError, Result};
use serde_json::{Map, Value};

/// Value rule applied to string attributes (and to list elements)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Matches `^[0-9]+$`
    Numeric,
    /// Non-empty and not only whitespace
    NotWhitespace,
}

impl Validator {
    fn check(self, value: &str) -> std::result::Result<(), &'static str> {
        match self {
            Validator::Numeric => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err("must be numeric")
                }
            }
            Validator::NotWhitespace => {
                if value.trim().is_empty() {
                    Err("must not be empty or whitespace")
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Set by the server, never validated on input
    Computed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    StringList,
    /// Repeated nested block, kept in order
    Blocks(Vec<Field>),
}

/// One attribute descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub default: Option<&'static str>,
    pub force_new: bool,
    pub validator: Option<Validator>,
    pub description: &'static str,
}

impl Field {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
            default: None,
            force_new: false,
            validator: None,
            description: "",
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn string_list(name: &'static str) -> Self {
        Self::new(name, FieldKind::StringList)
    }

    pub fn blocks(name: &'static str, fields: Vec<Field>) -> Self {
        Self::new(name, FieldKind::Blocks(fields))
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn computed(mut self) -> Self {
        self.presence = Presence::Computed;
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Attribute set of one resource type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Add a field, replacing any existing field of the same name
    pub fn insert(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Fill absent optional attributes with their defaults, including inside blocks
    pub fn apply_defaults(&self, data: &mut ResourceData) {
        apply_defaults(&self.fields, data.attrs_mut());
    }

    /// Check the record against the schema, reporting every violation at once
    pub fn validate(&self, data: &ResourceData) -> Result<()> {
        let mut errors = Vec::new();
        validate_map(&self.fields, data.attrs(), "", &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LldError::Validation(errors))
        }
    }

    /// Force-new attributes whose value differs between two records
    pub fn requires_replacement(&self, prior: &ResourceData, planned: &ResourceData) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.force_new && prior.get(f.name) != planned.get(f.name))
            .map(|f| f.name)
            .collect()
    }
}

fn apply_defaults(fields: &[Field], map: &mut Map<String, Value>) {
    for field in fields {
        let present = map.get(field.name).is_some_and(|v| !v.is_null());

        if !present {
            if let Some(default) = field.default {
                map.insert(field.name.to_string(), Value::String(default.to_string()));
            }
            continue;
        }

        if let FieldKind::Blocks(nested) = &field.kind {
            if let Some(Value::Array(blocks)) = map.get_mut(field.name) {
                for block in blocks.iter_mut().filter_map(Value::as_object_mut) {
                    apply_defaults(nested, block);
                }
            }
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn validate_map(fields: &[Field], map: &Map<String, Value>, prefix: &str, errors: &mut Vec<FieldError>) {
    for key in map.keys() {
        if !fields.iter().any(|f| f.name == key.as_str()) {
            errors.push(FieldError::new(join_path(prefix, key), "unsupported attribute"));
        }
    }

    for field in fields {
        let path = join_path(prefix, field.name);
        let value = map.get(field.name).filter(|v| !v.is_null());

        let Some(value) = value else {
            if field.presence == Presence::Required {
                errors.push(FieldError::new(path, "required attribute is missing"));
            }
            continue;
        };

        if field.presence == Presence::Computed {
            continue;
        }

        match &field.kind {
            FieldKind::String => validate_string(field, value, &path, errors),
            FieldKind::StringList => {
                let Some(items) = value.as_array() else {
                    errors.push(FieldError::new(path, "must be a list of strings"));
                    continue;
                };
                for (i, item) in items.iter().enumerate() {
                    validate_string(field, item, &format!("{}.{}", path, i), errors);
                }
            }
            FieldKind::Blocks(nested) => {
                let Some(blocks) = value.as_array() else {
                    errors.push(FieldError::new(path, "must be a list of blocks"));
                    continue;
                };
                for (i, block) in blocks.iter().enumerate() {
                    let block_path = format!("{}.{}", path, i);
                    match block.as_object() {
                        Some(block) => validate_map(nested, block, &block_path, errors),
                        None => errors.push(FieldError::new(block_path, "must be a block")),
                    }
                }
            }
        }
    }
}

fn validate_string(field: &Field, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
    let Some(s) = value.as_str() else {
        errors.push(FieldError::new(path, "must be a string"));
        return;
    };

    if let Some(validator) = field.validator {
        if let Err(message) = validator.check(s) {
            errors.push(FieldError::new(path, message));
        }
    }
}
