//! Type classification for specification properties
//!
//! Maps CloudFormation primitive names to JSON Schema types and decides the
//! shape category of a `Property`.

use cfn_schema_generator_common::Property;

/// JSON Schema primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Number,
    Boolean,
    Object,
}

impl JsonType {
    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
        }
    }
}

/// Shape of a list or map element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape<'a> {
    /// Primitive element; `None` when the primitive name is unknown
    Primitive(Option<JsonType>),
    /// Element is a named property type
    Reference(&'a str),
    /// No element type declared
    Any,
}

/// Shape category of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'a> {
    /// One of several alternatives, see the `*Types` lists on the property
    Polymorphic,
    /// Scalar; `None` when no JSON type is defined for it
    Primitive(Option<JsonType>),
    List(ItemShape<'a>),
    Map(ItemShape<'a>),
    /// Named property type
    Reference(&'a str),
}

/// Maps specification types to JSON Schema types
pub struct TypeMapper;

impl TypeMapper {
    /// Map a CloudFormation primitive name to its JSON type
    ///
    /// # Examples
    /// ```
    /// use cfn_schema_generator_parser::{JsonType, TypeMapper};
    ///
    /// assert_eq!(TypeMapper::map_primitive("Integer"), Some(JsonType::Number));
    /// assert_eq!(TypeMapper::map_primitive("Timestamp"), Some(JsonType::String));
    /// assert_eq!(TypeMapper::map_primitive("Blob"), None);
    /// ```
    pub fn map_primitive(name: &str) -> Option<JsonType> {
        match name {
            "String" | "Timestamp" => Some(JsonType::String),
            "Long" | "Integer" | "Double" => Some(JsonType::Number),
            "Boolean" => Some(JsonType::Boolean),
            "Json" | "Map" => Some(JsonType::Object),
            _ => None,
        }
    }

    /// JSON primitive type of a property.
    ///
    /// Uses the first non-empty of `PrimitiveType`, `PrimitiveItemType` and
    /// `ItemType`.
    pub fn json_primitive_type(property: &Property) -> Option<JsonType> {
        let name = [
            &property.primitive_type,
            &property.primitive_item_type,
            &property.item_type,
        ]
        .into_iter()
        .find(|name| !name.is_empty())?;

        Self::map_primitive(name)
    }

    pub fn has_json_primitive_type(property: &Property) -> bool {
        Self::json_primitive_type(property).is_some()
    }

    /// Classify a property.
    ///
    /// Precedence: polymorphic, primitive, list, map, custom reference. A
    /// property matching none of them falls back to its JSON primitive type.
    pub fn classify(property: &Property) -> Shape<'_> {
        if property.is_polymorphic() {
            Shape::Polymorphic
        } else if property.is_primitive() {
            Shape::Primitive(Self::map_primitive(&property.primitive_type))
        } else if property.is_list() {
            Shape::List(Self::item_shape(property))
        } else if property.is_map() {
            Shape::Map(Self::item_shape(property))
        } else if property.is_custom_type() {
            Shape::Reference(&property.type_tag)
        } else {
            Shape::Primitive(Self::json_primitive_type(property))
        }
    }

    /// Element shape of a list or map property
    pub fn item_shape(property: &Property) -> ItemShape<'_> {
        if !property.primitive_item_type.is_empty() {
            ItemShape::Primitive(Self::map_primitive(&property.primitive_item_type))
        } else if !property.item_type.is_empty() {
            Self::alternative(&property.item_type)
        } else {
            ItemShape::Any
        }
    }

    /// Shape of a named alternative: a known primitive name, otherwise a
    /// property type reference.
    pub fn alternative(name: &str) -> ItemShape<'_> {
        match Self::map_primitive(name) {
            Some(json_type) => ItemShape::Primitive(Some(json_type)),
            None => ItemShape::Reference(name),
        }
    }
}
