//! Top-level template schema
//!
//! Assembles the full document: one definition per resource type and per
//! property type, the static `Parameter` and `CustomResource` definitions,
//! and the template sections (`Resources`, `Parameters`, `Globals`, ...).

use crate::fragments::{definition_ref, SchemaRenderer, KEY_PATTERN};
use cfn_schema_generator_common::{GeneratorError, Globals, Result, Specification};
use serde_json::{json, Map, Value};

pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";
const CUSTOM_RESOURCE: &str = "CustomResource";
const PARAMETER: &str = "Parameter";

/// Render the complete schema document for a specification
pub fn render_document(spec: &Specification) -> Result<Value> {
    let renderer = SchemaRenderer::new(spec);
    let mut definitions = Map::new();

    for (name, resource) in &spec.resources {
        let properties = renderer.properties_object(name, resource, None)?;
        let has_required = !resource.required_properties().is_empty();
        insert_definition(
            &mut definitions,
            name,
            resource_definition(name, properties, has_required),
        )?;
    }

    for (name, property_type) in &spec.property_types {
        let properties = renderer.properties_object(name, property_type, None)?;
        insert_definition(&mut definitions, name, properties)?;
    }

    insert_definition(&mut definitions, PARAMETER, parameter_definition())?;
    insert_definition(&mut definitions, CUSTOM_RESOURCE, custom_resource_definition())?;

    let mut properties = Map::new();
    properties.insert(
        "AWSTemplateFormatVersion".to_string(),
        json!({ "enum": [TEMPLATE_FORMAT_VERSION], "type": "string" }),
    );
    properties.insert("Conditions".to_string(), keyed_objects());
    properties.insert("Description".to_string(), json!({ "type": "string" }));
    properties.insert("Mappings".to_string(), keyed_objects());
    properties.insert("Metadata".to_string(), json!({ "type": "object" }));
    properties.insert("Outputs".to_string(), keyed_objects());
    properties.insert(
        "Parameters".to_string(),
        json!({
            "additionalProperties": false,
            "maxProperties": 200,
            "patternProperties": { KEY_PATTERN: { "$ref": definition_ref(PARAMETER) } },
            "type": "object",
        }),
    );
    properties.insert("Resources".to_string(), resources_section(spec));
    properties.insert("Transform".to_string(), transform_section(spec));

    if let Some(globals) = spec.globals.as_ref().filter(|g| !g.is_empty()) {
        properties.insert(
            "Globals".to_string(),
            globals_section(spec, &renderer, globals)?,
        );
    }

    let mut required = vec!["Resources"];
    if !spec.resource_specification_transform.is_empty() {
        required.push("Transform");
    }

    Ok(json!({
        "$schema": SCHEMA_DIALECT,
        "additionalProperties": false,
        "definitions": definitions,
        "properties": properties,
        "required": required,
        "type": "object",
    }))
}

/// Wrap a resource type's properties in the template resource envelope
pub fn resource_definition(name: &str, properties: Value, has_required: bool) -> Value {
    let mut required = vec!["Type"];
    if has_required {
        required.push("Properties");
    }

    let mut envelope = resource_attributes();
    envelope.insert("Properties".to_string(), properties);
    envelope.insert(
        "Type".to_string(),
        json!({ "enum": [name], "type": "string" }),
    );

    json!({
        "additionalProperties": false,
        "properties": envelope,
        "required": required,
        "type": "object",
    })
}

fn insert_definition(
    definitions: &mut Map<String, Value>,
    name: &str,
    schema: Value,
) -> Result<()> {
    if definitions.contains_key(name) {
        return Err(GeneratorError::Render(format!(
            "Duplicate definition name '{}'",
            name
        )));
    }
    definitions.insert(name.to_string(), schema);
    Ok(())
}

/// Attributes shared by every resource entry in a template
fn resource_attributes() -> Map<String, Value> {
    let policy = json!({ "enum": ["Delete", "Retain", "Snapshot"], "type": "string" });

    let mut attributes = Map::new();
    attributes.insert("Condition".to_string(), json!({ "type": "string" }));
    attributes.insert("DeletionPolicy".to_string(), policy.clone());
    attributes.insert(
        "DependsOn".to_string(),
        json!({
            "anyOf": [
                { "pattern": KEY_PATTERN, "type": "string" },
                { "items": { "pattern": KEY_PATTERN, "type": "string" }, "type": "array" },
            ]
        }),
    );
    attributes.insert("Metadata".to_string(), json!({ "type": "object" }));
    attributes.insert("UpdateReplacePolicy".to_string(), policy);
    attributes
}

fn keyed_objects() -> Value {
    json!({
        "additionalProperties": false,
        "patternProperties": { KEY_PATTERN: { "type": "object" } },
        "type": "object",
    })
}

fn resources_section(spec: &Specification) -> Value {
    let mut choices: Vec<Value> = spec
        .resources
        .keys()
        .map(|name| json!({ "$ref": definition_ref(name) }))
        .collect();
    choices.push(json!({ "$ref": definition_ref(CUSTOM_RESOURCE) }));

    json!({
        "additionalProperties": false,
        "patternProperties": { KEY_PATTERN: { "anyOf": choices } },
        "type": "object",
    })
}

fn transform_section(spec: &Specification) -> Value {
    if spec.resource_specification_transform.is_empty() {
        json!({
            "anyOf": [
                { "type": "string" },
                { "items": { "type": "string" }, "type": "array" },
            ]
        })
    } else {
        json!({
            "enum": [spec.resource_specification_transform],
            "type": "string",
        })
    }
}

fn globals_section(
    spec: &Specification,
    renderer: &SchemaRenderer<'_>,
    globals: &Globals,
) -> Result<Value> {
    let mut properties = Map::new();
    for (name, global) in globals {
        let definition = spec.definition(&global.reference).ok_or_else(|| {
            GeneratorError::Render(format!(
                "Global '{}' references unknown type '{}'",
                name, global.reference
            ))
        })?;

        properties.insert(
            name.clone(),
            renderer.properties_object(&global.reference, definition, Some(global))?,
        );
    }

    Ok(json!({
        "additionalProperties": false,
        "properties": properties,
        "type": "object",
    }))
}

fn parameter_definition() -> Value {
    json!({
        "additionalProperties": false,
        "properties": {
            "AllowedPattern": { "type": "string" },
            "AllowedValues": { "type": "array" },
            "ConstraintDescription": { "type": "string" },
            "Default": { "type": ["string", "number", "boolean", "array"] },
            "Description": { "type": "string" },
            "MaxLength": { "type": ["string", "number"] },
            "MaxValue": { "type": ["string", "number"] },
            "MinLength": { "type": ["string", "number"] },
            "MinValue": { "type": ["string", "number"] },
            "NoEcho": { "type": ["string", "boolean"] },
            "Type": { "type": "string" },
        },
        "required": ["Type"],
        "type": "object",
    })
}

fn custom_resource_definition() -> Value {
    let mut envelope = resource_attributes();
    envelope.insert(
        "Properties".to_string(),
        json!({
            "additionalProperties": true,
            "properties": { "ServiceToken": { "type": "string" } },
            "required": ["ServiceToken"],
            "type": "object",
        }),
    );
    envelope.insert(
        "Type".to_string(),
        json!({ "pattern": "^Custom::[a-zA-Z0-9_@-]+$", "type": "string" }),
    );

    json!({
        "additionalProperties": false,
        "properties": envelope,
        "required": ["Type", "Properties"],
        "type": "object",
    })
}
