//! CloudFormation resource specification model
//!
//! Mirrors the published `CloudFormationResourceSpecification.json` document.
//! Everything is deserialized once and only read afterwards. Maps are
//! `BTreeMap`s so every walk over them is sorted and stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of a resource specification document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Specification {
    /// Specification version (e.g., "215.0.0")
    #[serde(default)]
    pub resource_specification_version: String,

    /// Transform identifier, set by SAM-style specifications
    #[serde(default)]
    pub resource_specification_transform: String,

    /// Resource types by name (e.g., "AWS::S3::Bucket")
    #[serde(rename = "ResourceTypes", default)]
    pub resources: BTreeMap<String, Resource>,

    /// Property types by name (e.g., "AWS::S3::Bucket.CorsRule", "Tag")
    #[serde(rename = "PropertyTypes", default)]
    pub property_types: BTreeMap<String, Resource>,

    /// Optional globals section
    #[serde(default)]
    pub globals: Option<Globals>,
}

impl Specification {
    /// Owning resource name of a definition.
    ///
    /// `"AWS::S3::Bucket.CorsRule"` and `"AWS::S3::Bucket"` both yield
    /// `"AWS::S3::Bucket"`.
    pub fn parent_name(definition_name: &str) -> &str {
        definition_name
            .split('.')
            .next()
            .unwrap_or(definition_name)
    }

    /// Look up a definition by name, resource types first.
    pub fn definition(&self, name: &str) -> Option<&Resource> {
        self.resources
            .get(name)
            .or_else(|| self.property_types.get(name))
    }
}

/// A resource type or a property type; both share the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
}

impl Resource {
    /// Names of the required properties, sorted ascending.
    pub fn required_properties(&self) -> Vec<&str> {
        // BTreeMap keys are already ordered
        self.properties
            .iter()
            .filter(|(_, property)| property.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Required property names as a comma separated list, e.g. `"Name, Type"`.
    pub fn required(&self) -> String {
        self.required_properties().join(", ")
    }
}

/// Shape of a single property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Property {
    pub item_type: String,
    pub primitive_item_type: String,
    pub primitive_type: String,
    pub required: bool,
    /// Structural tag: `"List"`, `"Map"` or the name of a property type
    #[serde(rename = "Type")]
    pub type_tag: String,
    pub primitive_types: Vec<String>,
    pub primitive_item_types: Vec<String>,
    pub item_types: Vec<String>,
    pub types: Vec<String>,
    pub inclusive_primitive_item_types: Vec<String>,
    pub inclusive_item_types: Vec<String>,
    pub inclusive_item_pattern: bool,
}

impl Property {
    /// Whether the property may take one of several shapes.
    pub fn is_polymorphic(&self) -> bool {
        !self.primitive_types.is_empty()
            || !self.primitive_item_types.is_empty()
            || !self.item_types.is_empty()
            || !self.types.is_empty()
            || !self.inclusive_primitive_item_types.is_empty()
            || !self.inclusive_item_types.is_empty()
    }

    pub fn is_primitive(&self) -> bool {
        !self.primitive_type.is_empty()
    }

    pub fn is_list(&self) -> bool {
        self.type_tag == "List"
    }

    pub fn is_map(&self) -> bool {
        self.type_tag == "Map"
    }

    /// Whether the property refers to a named property type.
    pub fn is_custom_type(&self) -> bool {
        self.primitive_type.is_empty()
            && self.item_type.is_empty()
            && self.primitive_item_type.is_empty()
            && !self.type_tag.is_empty()
            && !self.is_list()
            && !self.is_map()
    }
}

/// Globals section: global name (e.g., "Function") to its configuration
pub type Globals = BTreeMap<String, Global>;

/// Default configuration applied across one resource type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Global {
    /// Name of the referenced resource type
    pub reference: String,

    /// Property names that cannot be set globally
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Global {
    pub fn is_excluded(&self, property_name: &str) -> bool {
        self.exclude.iter().any(|excluded| excluded == property_name)
    }
}
