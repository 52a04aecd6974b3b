//! Specification loading and type classification
//!
//! This crate reads a CloudFormation resource specification into the
//! `Specification` model and classifies property shapes for rendering.
//!
//! ## Loading
//!
//! - URLs (`http://`, `https://`) are fetched with a single GET
//! - Anything else is read as a local file
//! - gzip payloads are decompressed transparently
//!
//! ## Classification precedence
//!
//! Polymorphic → Primitive → List → Map → Custom reference

mod fetcher;
mod type_mapper;

pub use fetcher::{
    FileSource, HttpSource, RawPayload, SpecFetcher, SpecLocation, SpecSource, DEFAULT_SPEC_URL,
};
pub use type_mapper::{ItemShape, JsonType, Shape, TypeMapper};

use cfn_schema_generator_common::{Result, Specification};

/// Load a specification from a URL or local path
///
/// # Arguments
/// * `location` - URL (`https://...`) or filesystem path, optionally gzip-encoded
pub fn load_specification(location: &str) -> Result<Specification> {
    let source = SpecLocation::parse(location).into_source();
    SpecFetcher::load(source.as_ref())
}
