//! Integration tests for schema generation

use cfn_schema_generator_common::{GeneratorError, Property, Resource, Specification};
use cfn_schema_generator_generator::{SchemaGenerator, SchemaRenderer, DEFAULT_SCHEMA_NAME};
use serde_json::{json, Value};
use tempfile::TempDir;

const BUCKET_SPEC: &str = r#"{
    "ResourceSpecificationVersion": "215.0.0",
    "ResourceTypes": {
        "AWS::S3::Bucket": {
            "Properties": {
                "BucketName": { "PrimitiveType": "String", "Required": false },
                "CorsConfiguration": { "Type": "CorsConfiguration", "Required": false },
                "ObjectLockEnabled": { "PrimitiveType": "Boolean", "Required": false },
                "Tags": { "Type": "List", "ItemType": "Tag", "Required": false }
            }
        },
        "AWS::SNS::Topic": {
            "Properties": {
                "TopicName": { "PrimitiveType": "String", "Required": true },
                "Subscription": { "Type": "List", "ItemType": "Subscription", "Required": false }
            }
        }
    },
    "PropertyTypes": {
        "AWS::S3::Bucket.CorsConfiguration": {
            "Properties": {
                "CorsRules": { "Type": "List", "ItemType": "CorsRule", "Required": true }
            }
        },
        "AWS::S3::Bucket.CorsRule": {
            "Properties": {
                "AllowedMethods": { "Type": "List", "PrimitiveItemType": "String", "Required": true },
                "MaxAge": { "PrimitiveType": "Integer", "Required": false }
            }
        },
        "AWS::SNS::Topic.Subscription": {
            "Properties": {
                "Endpoint": { "PrimitiveType": "String", "Required": true },
                "Protocol": { "PrimitiveType": "String", "Required": true }
            }
        },
        "Tag": {
            "Properties": {
                "Key": { "PrimitiveType": "String", "Required": true },
                "Value": { "PrimitiveType": "String", "Required": true }
            }
        }
    }
}"#;

fn bucket_spec() -> Specification {
    serde_json::from_str(BUCKET_SPEC).unwrap()
}

fn property(primitive_type: &str, required: bool) -> Property {
    Property {
        primitive_type: primitive_type.to_string(),
        required,
        ..Default::default()
    }
}

#[test]
fn test_required_and_primitive_properties() {
    let mut resource = Resource::default();
    resource
        .properties
        .insert("Name".to_string(), property("String", true));
    resource
        .properties
        .insert("Count".to_string(), property("Integer", false));

    let spec = Specification::default();
    let schema = SchemaRenderer::new(&spec)
        .properties_object("AWS::Example::Thing", &resource, None)
        .unwrap();

    assert_eq!(schema["required"], json!(["Name"]));
    assert_eq!(schema["properties"]["Name"]["type"], "string");
    assert_eq!(schema["properties"]["Count"]["type"], "number");
    assert_eq!(schema["type"], "object");
}

#[test]
fn test_list_of_primitives() {
    let list = Property {
        type_tag: "List".to_string(),
        primitive_item_type: "String".to_string(),
        ..Default::default()
    };

    let spec = Specification::default();
    let schema = SchemaRenderer::new(&spec)
        .property_schema("AWS::Example::Thing", "Names", &list)
        .unwrap();

    assert_eq!(schema["type"], "array");
    assert_eq!(schema["items"]["type"], "string");
}

#[test]
fn test_polymorphic_property_is_union() {
    let mut spec = Specification::default();
    spec.property_types.insert(
        "AWS::Serverless::Function.S3Location".to_string(),
        Resource::default(),
    );

    let code_uri = Property {
        primitive_types: vec!["String".to_string()],
        types: vec!["S3Location".to_string()],
        ..Default::default()
    };

    let schema = SchemaRenderer::new(&spec)
        .property_schema("AWS::Serverless::Function", "CodeUri", &code_uri)
        .unwrap();

    assert!(schema.get("type").is_none());
    assert_eq!(
        schema["anyOf"],
        json!([
            { "type": "string" },
            { "$ref": "#/definitions/AWS::Serverless::Function.S3Location" }
        ])
    );
}

#[test]
fn test_document_definitions_and_references() {
    let document = SchemaGenerator::new(bucket_spec(), DEFAULT_SCHEMA_NAME)
        .render()
        .unwrap();
    let definitions = &document["definitions"];

    let bucket = &definitions["AWS::S3::Bucket"];
    assert_eq!(bucket["required"], json!(["Type"]));
    let bucket_properties = &bucket["properties"]["Properties"]["properties"];
    assert_eq!(
        bucket_properties["CorsConfiguration"],
        json!({ "$ref": "#/definitions/AWS::S3::Bucket.CorsConfiguration" })
    );
    assert_eq!(
        bucket_properties["Tags"],
        json!({ "items": { "$ref": "#/definitions/Tag" }, "type": "array" })
    );
    assert_eq!(bucket_properties["ObjectLockEnabled"]["type"], "boolean");

    // References from one property type to another resolve under the same resource
    assert_eq!(
        definitions["AWS::S3::Bucket.CorsConfiguration"]["properties"]["CorsRules"]["items"],
        json!({ "$ref": "#/definitions/AWS::S3::Bucket.CorsRule" })
    );
    assert_eq!(
        definitions["AWS::S3::Bucket.CorsRule"]["required"],
        json!(["AllowedMethods"])
    );

    let topic = &definitions["AWS::SNS::Topic"];
    assert_eq!(topic["required"], json!(["Type", "Properties"]));
    assert_eq!(
        topic["properties"]["Properties"]["required"],
        json!(["TopicName"])
    );

    assert_eq!(
        document["properties"]["Resources"]["patternProperties"]["^[a-zA-Z0-9]+$"]["anyOf"],
        json!([
            { "$ref": "#/definitions/AWS::S3::Bucket" },
            { "$ref": "#/definitions/AWS::SNS::Topic" },
            { "$ref": "#/definitions/CustomResource" }
        ])
    );
}

#[test]
fn test_every_reference_points_at_a_definition() {
    fn collect_refs(value: &Value, refs: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(target)) = map.get("$ref") {
                    refs.push(target.clone());
                }
                map.values().for_each(|v| collect_refs(v, refs));
            }
            Value::Array(items) => items.iter().for_each(|v| collect_refs(v, refs)),
            _ => {}
        }
    }

    let document = SchemaGenerator::new(bucket_spec(), DEFAULT_SCHEMA_NAME)
        .render()
        .unwrap();
    let mut refs = Vec::new();
    collect_refs(&document, &mut refs);

    assert!(!refs.is_empty());
    for target in refs {
        let key = target.strip_prefix("#/definitions/").unwrap();
        assert!(
            document["definitions"].get(key).is_some(),
            "dangling reference {}",
            target
        );
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let first = SchemaGenerator::new(bucket_spec(), DEFAULT_SCHEMA_NAME)
        .render_to_bytes()
        .unwrap();
    let second = SchemaGenerator::new(bucket_spec(), DEFAULT_SCHEMA_NAME)
        .render_to_bytes()
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_output_is_valid_indented_json() {
    let bytes = SchemaGenerator::new(bucket_spec(), DEFAULT_SCHEMA_NAME)
        .render_to_bytes()
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();

    let reparsed: Value = serde_json::from_str(&text).expect("output must be valid JSON");
    assert!(reparsed["definitions"].is_object());
    assert!(text.starts_with("{\n    \"$schema\": "));
    assert!(text.ends_with("}\n"));
}

#[test]
fn test_generate_to_directory_creates_schema_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("schema");

    let generator = SchemaGenerator::new(bucket_spec(), DEFAULT_SCHEMA_NAME);
    let path = generator.generate_to_directory(&output_dir).unwrap();

    assert_eq!(path, output_dir.join("cloudformation.schema.json"));
    assert!(path.exists(), "schema file should be created");

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, generator.render_to_bytes().unwrap());
}

#[test]
fn test_write_failure_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-directory");
    std::fs::write(&blocker, "file").unwrap();

    let err = SchemaGenerator::new(bucket_spec(), DEFAULT_SCHEMA_NAME)
        .generate_to_directory(&blocker)
        .unwrap_err();

    assert!(matches!(err, GeneratorError::Write(_)), "{:?}", err);
    assert!(err.to_string().contains("not-a-directory"));
}

#[test]
fn test_unresolved_reference_aborts_generation() {
    let mut spec = bucket_spec();
    spec.property_types.remove("Tag");

    let temp_dir = TempDir::new().unwrap();
    let err = SchemaGenerator::new(spec, DEFAULT_SCHEMA_NAME)
        .generate_to_directory(temp_dir.path())
        .unwrap_err();

    assert!(matches!(err, GeneratorError::Render(_)));
    assert!(!temp_dir.path().join("cloudformation.schema.json").exists());
}
