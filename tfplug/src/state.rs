//! Declared state accessor
//!
//! `ResourceData` is the mutable view of a resource's attributes that
//! adapters read desired configuration from and project remote state into.
//! Keys use Terraform's flat notation: `name`, `health_checker.0.port`,
//! `metadata.owner`.

use crate::error::{Result, TfplugError};
use crate::types::{AttributePath, Dynamic, DynamicValue};
use std::collections::HashMap;

const ID_ATTRIBUTE: &str = "id";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    values: DynamicValue,
}

impl ResourceData {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            values: DynamicValue::object(),
        }
    }

    /// Wrap a configuration or state value; the id is taken from the `id`
    /// attribute when present
    pub fn from_state(state: DynamicValue) -> Self {
        let id = state
            .get(&AttributePath::new(ID_ATTRIBUTE))
            .and_then(Dynamic::as_str)
            .unwrap_or_default()
            .to_string();

        let values = if state.is_null() {
            DynamicValue::object()
        } else {
            state
        };

        Self { id, values }
    }

    /// The resulting state, or `None` when the id has been cleared (the
    /// resource no longer exists)
    pub fn into_state(self) -> Option<DynamicValue> {
        if self.id.is_empty() {
            None
        } else {
            Some(self.values)
        }
    }

    /// The underlying values regardless of id
    pub fn values(&self) -> &DynamicValue {
        &self.values
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the resource id; an empty id marks the resource as gone
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        let value = if self.id.is_empty() {
            Dynamic::Null
        } else {
            Dynamic::String(self.id.clone())
        };
        // The root is always an object so a top-level set cannot fail
        let _ = self.values.set(&AttributePath::new(ID_ATTRIBUTE), value);
    }

    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        self.values.get(&parse_key(key))
    }

    /// Terraform `GetOk` semantics: absent, null, unknown and zero values
    /// are all reported as not set
    pub fn get_ok(&self, key: &str) -> Option<&Dynamic> {
        self.get(key).filter(|v| !v.is_zero())
    }

    pub fn set(&mut self, key: &str, value: impl Into<Dynamic>) -> Result<()> {
        let path = parse_key(key);
        self.values.set(&path, value.into())
    }

    /// Zero value ("") when unset
    pub fn get_string(&self, key: &str) -> String {
        self.get(key)
            .and_then(Dynamic::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Zero value (0) when unset
    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).and_then(Dynamic::as_i64).unwrap_or_default()
    }

    /// Zero value (false) when unset
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Dynamic::as_bool).unwrap_or_default()
    }

    pub fn get_ok_string(&self, key: &str) -> Option<String> {
        self.get_ok(key)
            .and_then(Dynamic::as_str)
            .map(str::to_string)
    }

    pub fn get_ok_int(&self, key: &str) -> Option<i64> {
        self.get_ok(key).and_then(Dynamic::as_i64)
    }

    pub fn get_ok_bool(&self, key: &str) -> Option<bool> {
        self.get_ok(key).and_then(Dynamic::as_bool)
    }

    pub fn get_ok_list(&self, key: &str) -> Option<&[Dynamic]> {
        self.get_ok(key).and_then(Dynamic::as_list)
    }

    /// The first element of a single-item list block, or a map-valued block
    pub fn get_ok_block(&self, key: &str) -> Option<&HashMap<String, Dynamic>> {
        match self.get_ok(key)? {
            Dynamic::List(items) => items.first().and_then(Dynamic::as_map),
            Dynamic::Map(map) => Some(map),
            _ => None,
        }
    }

    /// String entries of a map attribute; non-string values are skipped
    pub fn get_string_map(&self, key: &str) -> HashMap<String, String> {
        self.get(key)
            .and_then(Dynamic::as_map)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// String elements of a list attribute; non-string values are skipped
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Dynamic::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Dynamic::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Like `get_string` but fails when the attribute is absent
    pub fn require_string(&self, key: &str) -> Result<String> {
        self.get_ok_string(key)
            .ok_or_else(|| TfplugError::MissingAttribute(key.to_string()))
    }
}

/// Flat Terraform keys to attribute paths. Numeric segments index lists.
fn parse_key(key: &str) -> AttributePath {
    let mut path = AttributePath::root();
    for segment in key.split('.') {
        path = match segment.parse::<i64>() {
            Ok(idx) if !path.steps.is_empty() => path.index(idx),
            _ => path.attribute(segment),
        };
    }
    path
}
