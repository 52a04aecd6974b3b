//! JSON Schema generation for CloudFormation templates
//!
//! This crate turns a parsed `Specification` into a JSON Schema document
//! and writes it to disk.
//!
//! The schema is built as an in-memory `serde_json::Value` tree and
//! serialized once, so the output is always valid JSON. Object keys are
//! sorted, which keeps the output byte-identical across runs.

mod document;
mod fragments;
mod output;

pub use document::{render_document, resource_definition, SCHEMA_DIALECT};
pub use fragments::{definition_ref, SchemaRenderer, KEY_PATTERN};
pub use output::{schema_file_name, to_pretty_json, write_schema};

use cfn_schema_generator_common::{Result, Specification};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default schema name, producing `cloudformation.schema.json`
pub const DEFAULT_SCHEMA_NAME: &str = "cloudformation";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "schema";

/// Schema generator
///
/// Renders a `Specification` into a JSON Schema document:
/// - one definition per resource type and property type
/// - template sections (`Resources`, `Parameters`, `Outputs`, ...)
/// - an optional `Globals` section
pub struct SchemaGenerator {
    spec: Specification,
    name: String,
}

impl SchemaGenerator {
    /// Create a generator for `spec`; `name` selects the output file name
    pub fn new(spec: Specification, name: &str) -> Self {
        Self {
            spec,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    /// Render the schema document
    pub fn render(&self) -> Result<Value> {
        render_document(&self.spec)
    }

    /// Render and format the schema document
    pub fn render_to_bytes(&self) -> Result<Vec<u8>> {
        to_pretty_json(&self.render()?)
    }

    /// Render, format and write the schema into `output_dir`
    pub fn generate_to_directory(&self, output_dir: &Path) -> Result<PathBuf> {
        let contents = self.render_to_bytes()?;
        write_schema(output_dir, &self.name, &contents)
    }
}

/// Generate a schema file (convenience function)
pub fn generate_schema(spec: Specification, name: &str, output_dir: &Path) -> Result<PathBuf> {
    SchemaGenerator::new(spec, name).generate_to_directory(output_dir)
}
