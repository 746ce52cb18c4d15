//! Resource record exchanged with the infrastructure-as-code driver

use crate::error::{LldError, Result};
use serde_json::{Map, Value};

/// Attribute name carrying the resource identifier in serialized records
const ID_FIELD: &str = "id";

/// Identifier plus attribute map of one managed resource.
///
/// An empty identifier means the resource does not exist remotely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    attrs: Map<String, Value>,
}

impl ResourceData {
    pub fn new(attrs: Map<String, Value>) -> Self {
        Self {
            id: String::new(),
            attrs,
        }
    }

    /// Build from a JSON object; a string `id` member becomes the identifier
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut attrs) = value else {
            return Err(LldError::InvalidRecord(
                "expected a JSON object".to_string(),
            ));
        };

        let id = match attrs.remove(ID_FIELD) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(LldError::InvalidRecord(format!(
                    "'id' must be a string, got {}",
                    other
                )))
            }
        };

        Ok(Self { id, attrs })
    }

    /// Serialize back to a JSON object, with `id` alongside the attributes
    pub fn to_value(&self) -> Value {
        let mut map = self.attrs.clone();
        map.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        Value::Object(map)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub(crate) fn attrs_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.attrs
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// String attribute, or `""` when absent or not a string
    pub fn get_str(&self, key: &str) -> &str {
        self.attrs.get(key).and_then(|v| v.as_str()).unwrap_or("")
    }

    /// List attribute, or an empty slice when absent or not a list
    pub fn get_list(&self, key: &str) -> &[Value] {
        self.attrs
            .get(key)
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attrs.insert(key.to_string(), value.into());
    }
}
