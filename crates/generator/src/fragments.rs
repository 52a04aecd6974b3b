//! Schema fragments for properties and property sets
//!
//! Each property is classified with `TypeMapper` and turned into a
//! `serde_json::Value`. References to property types are resolved against
//! the specification while rendering.
//!
//! ## Reference resolution
//!
//! A tag `T` used by a property of definition `D` resolves to:
//! 1. `"<parent(D)>.<T>"` if that property type exists
//! 2. `"T"` if that property type exists (shared types such as `Tag`)
//!
//! Anything else is a render error.

use cfn_schema_generator_common::{
    GeneratorError, Global, Property, Resource, Result, Specification,
};
use cfn_schema_generator_parser::{ItemShape, JsonType, Shape, TypeMapper};
use serde_json::{json, Map, Value};

/// Key pattern for logical IDs and map keys
pub const KEY_PATTERN: &str = "^[a-zA-Z0-9]+$";

/// Renders property and property-set fragments for one specification
pub struct SchemaRenderer<'a> {
    spec: &'a Specification,
}

impl<'a> SchemaRenderer<'a> {
    pub fn new(spec: &'a Specification) -> Self {
        Self { spec }
    }

    /// Resolve a property type tag to its definition key
    ///
    /// `owner` is the definition the property belongs to.
    pub fn resolve(&self, owner: &str, tag: &str) -> Option<String> {
        let qualified = format!("{}.{}", Specification::parent_name(owner), tag);
        if self.spec.property_types.contains_key(&qualified) {
            Some(qualified)
        } else if self.spec.property_types.contains_key(tag) {
            Some(tag.to_string())
        } else {
            None
        }
    }

    /// Object schema for a set of properties
    ///
    /// With a `global`, its excluded properties are dropped and no
    /// `required` keyword is emitted.
    pub fn properties_object(
        &self,
        owner: &str,
        resource: &Resource,
        global: Option<&Global>,
    ) -> Result<Value> {
        let mut properties = Map::new();
        for (name, property) in &resource.properties {
            if global.is_some_and(|g| g.is_excluded(name)) {
                continue;
            }
            properties.insert(name.clone(), self.property_schema(owner, name, property)?);
        }

        let mut object = Map::new();
        object.insert("additionalProperties".to_string(), Value::Bool(false));
        object.insert("properties".to_string(), Value::Object(properties));
        if global.is_none() {
            let required = resource.required_properties();
            if !required.is_empty() {
                object.insert("required".to_string(), json!(required));
            }
        }
        object.insert("type".to_string(), json!("object"));

        Ok(Value::Object(object))
    }

    /// Schema fragment for a single property
    pub fn property_schema(&self, owner: &str, name: &str, property: &Property) -> Result<Value> {
        match TypeMapper::classify(property) {
            Shape::Polymorphic => self.polymorphic_schema(owner, name, property),
            Shape::Primitive(json_type) => Ok(primitive_schema(json_type)),
            Shape::List(item) => {
                let mut list = Map::new();
                if let Some(items) = self.item_schema(owner, name, item)? {
                    list.insert("items".to_string(), items);
                }
                list.insert("type".to_string(), json!("array"));
                Ok(Value::Object(list))
            }
            Shape::Map(item) => {
                let values = self
                    .item_schema(owner, name, item)?
                    .unwrap_or(Value::Bool(true));
                Ok(json!({
                    "additionalProperties": values,
                    "type": "object",
                }))
            }
            Shape::Reference(tag) => self.reference(owner, name, tag),
        }
    }

    fn polymorphic_schema(&self, owner: &str, name: &str, property: &Property) -> Result<Value> {
        let container = |element: Value| {
            if property.is_map() {
                json!({ "additionalProperties": element, "type": "object" })
            } else {
                json!({ "items": element, "type": "array" })
            }
        };

        let mut branches = Vec::new();
        for primitive in &property.primitive_types {
            branches.push(primitive_schema(TypeMapper::map_primitive(primitive)));
        }
        for tag in &property.types {
            branches.push(self.reference(owner, name, tag)?);
        }
        for primitive in &property.primitive_item_types {
            branches.push(container(primitive_schema(TypeMapper::map_primitive(
                primitive,
            ))));
        }
        for tag in &property.item_types {
            branches.push(container(self.reference(owner, name, tag)?));
        }

        let mut inclusive = Vec::new();
        for primitive in &property.inclusive_primitive_item_types {
            inclusive.push(primitive_schema(TypeMapper::map_primitive(primitive)));
        }
        for tag in &property.inclusive_item_types {
            inclusive.push(self.reference(owner, name, tag)?);
        }
        if !inclusive.is_empty() {
            let element = if inclusive.len() == 1 {
                inclusive.remove(0)
            } else {
                json!({ "anyOf": inclusive })
            };

            if property.inclusive_item_pattern {
                branches.push(json!({
                    "additionalProperties": false,
                    "patternProperties": { KEY_PATTERN: element },
                    "type": "object",
                }));
            } else {
                branches.push(container(element));
            }
        }

        Ok(json!({ "anyOf": branches }))
    }

    fn item_schema(&self, owner: &str, name: &str, item: ItemShape<'_>) -> Result<Option<Value>> {
        match item {
            ItemShape::Primitive(json_type) => Ok(Some(primitive_schema(json_type))),
            ItemShape::Reference(tag) => self.reference(owner, name, tag).map(Some),
            ItemShape::Any => Ok(None),
        }
    }

    fn reference(&self, owner: &str, name: &str, tag: &str) -> Result<Value> {
        let key = self.resolve(owner, tag).ok_or_else(|| {
            GeneratorError::Render(format!(
                "{} property '{}': unknown property type '{}' (tried '{}.{}' and '{}')",
                owner,
                name,
                tag,
                Specification::parent_name(owner),
                tag,
                tag
            ))
        })?;

        Ok(json!({ "$ref": definition_ref(&key) }))
    }
}

/// JSON pointer to a definition
pub fn definition_ref(key: &str) -> String {
    format!("#/definitions/{}", key)
}

/// `{"type": ...}`, or `{}` when no JSON type is defined
fn primitive_schema(json_type: Option<JsonType>) -> Value {
    match json_type {
        Some(json_type) => json!({ "type": json_type.as_str() }),
        None => json!({}),
    }
}
