//! Common types and utilities for the CloudFormation Schema Generator
//!
//! This crate contains the in-memory specification model and the error type
//! shared by the parser, generator, and CLI components.

mod spec;

pub use spec::{Global, Globals, Property, Resource, Specification};

use thiserror::Error;

/// Errors that can occur while producing a schema.
///
/// Each variant names the stage of the run that failed. All of them are
/// fatal: the run stops at the first one.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Decompress error: {0}")]
    Decompress(String),

    #[error("Deserialize error: {0}")]
    Deserialize(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Validate error: {0}")]
    Validate(String),

    #[error("Write error: {0}")]
    Write(String),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
