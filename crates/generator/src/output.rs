//! Formatting and writing of the generated schema

use cfn_schema_generator_common::{GeneratorError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs;
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

/// File name for a schema, e.g. `cloudformation.schema.json`
pub fn schema_file_name(name: &str) -> String {
    format!("{}.schema.json", name)
}

/// Serialize a schema as 4-space indented JSON with a trailing newline
pub fn to_pretty_json(schema: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    schema.serialize(&mut serializer).map_err(|e| {
        GeneratorError::Validate(format!("Failed to serialize JSON Schema: {}", e))
    })?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write a formatted schema to `<output_dir>/<name>.schema.json`
///
/// The directory is created when missing. Returns the written path.
pub fn write_schema(output_dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| {
        GeneratorError::Write(format!(
            "Failed to create schema directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let path = output_dir.join(schema_file_name(name));
    fs::write(&path, contents).map_err(|e| {
        GeneratorError::Write(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(path)
}
