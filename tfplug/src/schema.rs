//! Schema types and builders for tfplug
//!
//! This module provides the schema system for defining provider, resource and
//! data source schemas: attribute types, nested blocks, defaults, validation,
//! and force-new detection.

use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use crate::validator::Validator;
use std::collections::HashMap;
use std::sync::Arc;

static NULL: Dynamic = Dynamic::Null;

/// AttributeType defines the type system for Terraform attributes
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number, // Always f64
    Bool,
    List(Box<AttributeType>),               // Ordered, allows duplicates
    Set(Box<AttributeType>),                // Unordered, no duplicates
    Map(Box<AttributeType>),                // String keys only
    Object(HashMap<String, AttributeType>), // Fixed structure
}

impl AttributeType {
    /// Whether a value conforms to this type. Null and unknown conform to
    /// every type.
    pub fn accepts(&self, value: &Dynamic) -> bool {
        match (self, value) {
            (_, Dynamic::Null) | (_, Dynamic::Unknown) => true,
            (AttributeType::String, Dynamic::String(_)) => true,
            (AttributeType::Number, Dynamic::Number(_)) => true,
            (AttributeType::Bool, Dynamic::Bool(_)) => true,
            (AttributeType::List(inner), Dynamic::List(items))
            | (AttributeType::Set(inner), Dynamic::List(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (AttributeType::Map(inner), Dynamic::Map(map)) => {
                map.values().all(|v| inner.accepts(v))
            }
            (AttributeType::Object(fields), Dynamic::Map(map)) => map
                .iter()
                .all(|(k, v)| fields.get(k).is_some_and(|t| t.accepts(v))),
            _ => false,
        }
    }
}

/// Schema is returned by providers/resources/data sources
/// Version is used for state migration
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub version: i64,
    pub block: Block,
}

/// Block represents a configuration block
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub attributes: Vec<Attribute>,
    pub block_types: Vec<NestedBlock>,
    pub description: String,
}

/// Attribute represents a single configuration attribute
#[derive(Clone)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Changing the value forces the resource to be replaced
    pub requires_replace: bool,
    pub default: Option<Dynamic>,
    pub validators: Vec<Arc<dyn Validator>>,
}

// Manual Debug implementation since validators don't implement Debug
impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("requires_replace", &self.requires_replace)
            .field("default", &self.default)
            .field(
                "validators",
                &format!("{} validators", self.validators.len()),
            )
            .finish()
    }
}

/// NestedBlock represents a nested configuration block
#[derive(Debug, Clone)]
pub struct NestedBlock {
    pub type_name: String,
    pub block: Block,
    pub nesting: NestingMode,
    pub min_items: usize,
    /// Zero means unbounded
    pub max_items: usize,
    pub requires_replace: bool,
}

/// NestingMode defines how nested blocks are structured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingMode {
    /// A single object
    Single,
    /// A list of objects
    List,
    /// A set of objects, stored as a list
    Set,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.block.attributes.iter().find(|a| a.name == name)
    }

    pub fn nested_block(&self, name: &str) -> Option<&NestedBlock> {
        self.block.block_types.iter().find(|b| b.type_name == name)
    }

    /// Paths of required attributes (and blocks with `min_items`) that have
    /// no value
    pub fn missing_required(&self, value: &DynamicValue) -> Vec<AttributePath> {
        let mut missing = Vec::new();
        self.block
            .missing_required(&value.value, &AttributePath::root(), &mut missing);
        missing
    }

    /// Fill unset optional attributes with their declared defaults
    pub fn apply_defaults(&self, value: &mut DynamicValue) {
        if value.value.is_null() {
            value.value = Dynamic::Map(HashMap::new());
        }
        self.block.apply_defaults(&mut value.value);
    }

    /// Check required attributes, types, block counts and attribute validators
    pub fn validate(&self, value: &DynamicValue) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        self.block
            .validate(&value.value, &AttributePath::root(), &mut diagnostics);
        diagnostics
    }

    /// Top-level attributes and blocks marked `requires_replace` whose value
    /// differs between prior state and the planned state
    pub fn requires_replace(
        &self,
        prior: &DynamicValue,
        planned: &DynamicValue,
    ) -> Vec<AttributePath> {
        if prior.is_null() {
            return Vec::new();
        }

        let changed = |name: &str| {
            let path = AttributePath::new(name);
            let before = prior.get(&path).unwrap_or(&NULL);
            let after = planned.get(&path).unwrap_or(&NULL);
            !after.is_unknown() && before != after
        };

        let attributes = self
            .block
            .attributes
            .iter()
            .filter(|a| a.requires_replace)
            .map(|a| a.name.as_str());
        let blocks = self
            .block
            .block_types
            .iter()
            .filter(|b| b.requires_replace)
            .map(|b| b.type_name.as_str());

        attributes
            .chain(blocks)
            .filter(|name| changed(*name))
            .map(AttributePath::new)
            .collect()
    }

    /// Keep prior values of computed attributes the configuration leaves
    /// unset, as Terraform does when planning an update
    pub fn carry_computed(&self, prior: &DynamicValue, planned: &mut DynamicValue) {
        let (Some(prior), Dynamic::Map(map)) = (prior.value.as_map(), &mut planned.value) else {
            return;
        };

        let attributes = &self.block.attributes;
        for attr in attributes.iter().filter(|a| a.computed && !a.required) {
            let Some(value) = prior.get(&attr.name).filter(|v| !v.is_null()) else {
                continue;
            };
            let slot = map.entry(attr.name.clone()).or_insert(Dynamic::Null);
            if slot.is_null() {
                *slot = value.clone();
            }
        }
    }
}

fn field<'a>(object: &'a Dynamic, name: &str) -> &'a Dynamic {
    object.as_map().and_then(|m| m.get(name)).unwrap_or(&NULL)
}

fn child(base: &AttributePath, name: &str) -> AttributePath {
    base.clone().attribute(name)
}

impl Block {
    fn missing_required(
        &self,
        object: &Dynamic,
        base: &AttributePath,
        out: &mut Vec<AttributePath>,
    ) {
        for attr in self.attributes.iter().filter(|a| a.required) {
            if field(object, &attr.name).is_null() {
                out.push(child(base, &attr.name));
            }
        }

        for nested in &self.block_types {
            let items = nested.items(field(object, &nested.type_name));
            let path = child(base, &nested.type_name);
            if items.len() < nested.min_items {
                out.push(path.clone());
            }
            for (i, item) in items.iter().enumerate() {
                let item_path = match nested.nesting {
                    NestingMode::Single => path.clone(),
                    _ => path.clone().index(i as i64),
                };
                nested.block.missing_required(item, &item_path, out);
            }
        }
    }

    fn apply_defaults(&self, object: &mut Dynamic) {
        let Dynamic::Map(map) = object else { return };

        for attr in &self.attributes {
            if let Some(default) = &attr.default {
                let slot = map.entry(attr.name.clone()).or_insert(Dynamic::Null);
                if slot.is_null() {
                    *slot = default.clone();
                }
            }
        }

        for nested in &self.block_types {
            match map.get_mut(&nested.type_name) {
                Some(Dynamic::List(items)) => {
                    for item in items.iter_mut() {
                        nested.block.apply_defaults(item);
                    }
                }
                Some(item @ Dynamic::Map(_)) => nested.block.apply_defaults(item),
                _ => {}
            }
        }
    }

    fn validate(&self, object: &Dynamic, base: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        for attr in &self.attributes {
            let value = field(object, &attr.name);
            let path = child(base, &attr.name);

            if value.is_null() {
                if attr.required {
                    diagnostics.push(
                        Diagnostic::error(
                            "Missing required argument",
                            format!(
                                "The argument \"{}\" is required, but no definition was found.",
                                path
                            ),
                        )
                        .with_attribute(path),
                    );
                }
                continue;
            }
            if value.is_unknown() {
                continue;
            }
            if !attr.r#type.accepts(value) {
                diagnostics.push(
                    Diagnostic::error(
                        "Incorrect attribute value type",
                        format!(
                            "Inappropriate value for attribute \"{}\": expected {:?}, got {}.",
                            path,
                            attr.r#type,
                            value.type_name()
                        ),
                    )
                    .with_attribute(path),
                );
                continue;
            }
            for validator in &attr.validators {
                validator.validate(value, &path, diagnostics);
            }
        }

        for nested in &self.block_types {
            let items = nested.items(field(object, &nested.type_name));
            let path = child(base, &nested.type_name);

            if items.len() < nested.min_items {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Insufficient {} blocks", nested.type_name),
                        format!(
                            "At least {} \"{}\" blocks are required.",
                            nested.min_items, path
                        ),
                    )
                    .with_attribute(path.clone()),
                );
            }
            if nested.max_items > 0 && items.len() > nested.max_items {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Too many {} blocks", nested.type_name),
                        format!(
                            "No more than {} \"{}\" blocks are allowed.",
                            nested.max_items, path
                        ),
                    )
                    .with_attribute(path.clone()),
                );
            }
            for (i, item) in items.iter().enumerate() {
                let item_path = match nested.nesting {
                    NestingMode::Single => path.clone(),
                    _ => path.clone().index(i as i64),
                };
                nested.block.validate(item, &item_path, diagnostics);
            }
        }
    }
}

impl NestedBlock {
    fn items<'a>(&self, value: &'a Dynamic) -> Vec<&'a Dynamic> {
        match (self.nesting, value) {
            (NestingMode::Single, Dynamic::Map(_)) => vec![value],
            (NestingMode::List | NestingMode::Set, Dynamic::List(items)) => items.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// AttributeBuilder provides fluent API for building attributes
/// ALWAYS use this instead of constructing Attribute directly
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    /// Create a new attribute builder
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                requires_replace: false,
                default: None,
                validators: Vec::new(),
            },
        }
    }

    /// Set description
    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    /// Mark as computed
    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    /// Mark as sensitive (hidden)
    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    /// Changing this attribute destroys and recreates the resource
    pub fn requires_replace(mut self) -> Self {
        self.attribute.requires_replace = true;
        self
    }

    /// Value used when the attribute is not set in configuration
    pub fn default(mut self, value: impl Into<Dynamic>) -> Self {
        self.attribute.default = Some(value.into());
        self
    }

    /// Add validator
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.attribute.validators.push(Arc::new(validator));
        self
    }

    /// Finalize the attribute
    pub fn build(self) -> Attribute {
        self.attribute
    }
}

pub struct NestedBlockBuilder {
    nested: NestedBlock,
}

impl NestedBlockBuilder {
    /// A list nested block; use `nesting` for other modes
    pub fn new(type_name: &str) -> Self {
        Self {
            nested: NestedBlock {
                type_name: type_name.to_string(),
                block: Block::default(),
                nesting: NestingMode::List,
                min_items: 0,
                max_items: 0,
                requires_replace: false,
            },
        }
    }

    pub fn nesting(mut self, nesting: NestingMode) -> Self {
        self.nested.nesting = nesting;
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.nested.block.description = desc.to_string();
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.nested.block.attributes.push(attr);
        self
    }

    pub fn block(mut self, block: NestedBlock) -> Self {
        self.nested.block.block_types.push(block);
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.nested.min_items = min;
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.nested.max_items = max;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.nested.requires_replace = true;
        self
    }

    pub fn build(self) -> NestedBlock {
        self.nested
    }
}

/// SchemaBuilder provides fluent API for building schemas
/// ALWAYS use this for consistency
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self {
            schema: Schema::default(),
        }
    }

    /// Set schema version
    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    /// Add attribute
    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.block.attributes.push(attr);
        self
    }

    /// Add nested block
    pub fn block(mut self, block: NestedBlock) -> Self {
        self.schema.block.block_types.push(block);
        self
    }

    /// Set description
    pub fn description(mut self, desc: &str) -> Self {
        self.schema.block.description = desc.to_string();
        self
    }

    /// Finalize the schema
    pub fn build(self) -> Schema {
        self.schema
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{NumberRangeValidator, StringOneOfValidator};
    use serde_json::json;

    fn backend_set_schema() -> Schema {
        SchemaBuilder::new()
            .attribute(
                AttributeBuilder::new("load_balancer_id", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("policy", AttributeType::String)
                    .required()
                    .validator(StringOneOfValidator::new(["ROUND_ROBIN", "IP_HASH"]))
                    .build(),
            )
            .block(
                NestedBlockBuilder::new("health_checker")
                    .min_items(1)
                    .max_items(1)
                    .attribute(
                        AttributeBuilder::new("port", AttributeType::Number)
                            .optional()
                            .default(80)
                            .validator(NumberRangeValidator::port())
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new("protocol", AttributeType::String)
                            .required()
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    #[test]
    fn attribute_builder_creates_required_string() {
        let attr = AttributeBuilder::new("name", AttributeType::String)
            .description("The name of the resource")
            .required()
            .build();

        assert_eq!(attr.name, "name");
        assert!(matches!(attr.r#type, AttributeType::String));
        assert!(attr.required);
        assert!(!attr.optional);
        assert_eq!(attr.description, "The name of the resource");
    }

    #[test]
    fn missing_required_walks_nested_blocks() {
        let schema = backend_set_schema();
        let value = DynamicValue::from_json(json!({
            "policy": "ROUND_ROBIN",
            "health_checker": [{"port": 80}]
        }));

        let missing: Vec<String> = schema
            .missing_required(&value)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            missing,
            vec!["load_balancer_id", "health_checker[0].protocol"]
        );
    }

    #[test]
    fn missing_block_is_reported() {
        let schema = backend_set_schema();
        let value = DynamicValue::from_json(json!({
            "load_balancer_id": "lb-1",
            "policy": "ROUND_ROBIN"
        }));

        let missing = schema.missing_required(&value);
        assert_eq!(missing, vec![AttributePath::new("health_checker")]);
    }

    #[test]
    fn defaults_fill_nested_attributes() {
        let schema = backend_set_schema();
        let mut value = DynamicValue::from_json(json!({
            "health_checker": [{"protocol": "HTTP"}]
        }));

        schema.apply_defaults(&mut value);

        let port = AttributePath::new("health_checker")
            .index(0)
            .attribute("port");
        assert_eq!(value.get_number(&port).unwrap(), 80.0);
    }

    #[test]
    fn validate_runs_attribute_validators() {
        let schema = backend_set_schema();
        let value = DynamicValue::from_json(json!({
            "load_balancer_id": "lb-1",
            "policy": "RANDOM",
            "health_checker": [{"protocol": "HTTP", "port": 0}]
        }));

        let diags = schema.validate(&value);
        assert_eq!(diags.len(), 2);
        assert!(diags[0].summary.contains("policy must be one of"));
        assert!(diags[1].summary.contains("health_checker[0].port must be at least 1"));
    }

    #[test]
    fn validate_reports_type_mismatch_and_block_count() {
        let schema = backend_set_schema();
        let value = DynamicValue::from_json(json!({
            "load_balancer_id": 42,
            "policy": "IP_HASH",
            "health_checker": [{"protocol": "HTTP"}, {"protocol": "TCP"}]
        }));

        let diags = schema.validate(&value);
        let summaries: Vec<&str> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec!["Incorrect attribute value type", "Too many health_checker blocks"]
        );
    }

    #[test]
    fn requires_replace_only_for_changed_force_new_attributes() {
        let schema = backend_set_schema();
        let prior = DynamicValue::from_json(json!({
            "load_balancer_id": "lb-1",
            "policy": "IP_HASH",
        }));
        let same = DynamicValue::from_json(json!({
            "load_balancer_id": "lb-1",
            "policy": "ROUND_ROBIN",
        }));
        let moved = DynamicValue::from_json(json!({
            "load_balancer_id": "lb-2",
            "policy": "IP_HASH",
        }));

        assert!(schema.requires_replace(&prior, &same).is_empty());
        assert_eq!(
            schema.requires_replace(&prior, &moved),
            vec![AttributePath::new("load_balancer_id")]
        );
        assert!(schema.requires_replace(&DynamicValue::null(), &moved).is_empty());
    }

    #[test]
    fn computed_values_survive_into_the_plan() {
        let schema = SchemaBuilder::new()
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("state", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .build(),
            )
            .build();
        let prior = DynamicValue::from_json(json!({"id": "x", "state": "ACTIVE", "name": "a"}));
        let mut planned = DynamicValue::from_json(json!({"name": "b", "state": "UPDATING"}));

        schema.carry_computed(&prior, &mut planned);

        assert_eq!(
            planned.to_json(),
            json!({"id": "x", "state": "UPDATING", "name": "b"})
        );
    }

    #[test]
    fn nested_attribute_type() {
        let object_type = AttributeType::Object(HashMap::from([
            ("host".to_string(), AttributeType::String),
            ("port".to_string(), AttributeType::Number),
        ]));

        assert!(object_type.accepts(&Dynamic::from(json!({"host": "a", "port": 1}))));
        assert!(!object_type.accepts(&Dynamic::from(json!({"host": 1}))));
        assert!(!object_type.accepts(&Dynamic::from(json!({"other": "x"}))));
    }
}
