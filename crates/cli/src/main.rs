//! CloudFormation Schema Generator CLI
//!
//! Downloads the published CloudFormation resource specification and writes
//! a JSON Schema for CloudFormation templates. Runs with no arguments.

use anyhow::{Context, Result};
use cfn_schema_generator_common::Specification;
use cfn_schema_generator_generator::{
    schema_file_name, SchemaGenerator, DEFAULT_OUTPUT_DIR, DEFAULT_SCHEMA_NAME,
};
use cfn_schema_generator_parser::{SpecFetcher, SpecLocation, DEFAULT_SPEC_URL};
use clap::Parser;
use colored::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cfn-schema-generator")]
#[command(version, about = "Generate a JSON Schema from the CloudFormation resource specification", long_about = None)]
#[command(after_help = "EXAMPLES:\n  \
    # Download the published specification and write schema/cloudformation.schema.json\n  \
    cfn-schema-generator\n\n  \
    # Use a local (optionally gzipped) specification\n  \
    cfn-schema-generator --spec ./CloudFormationResourceSpecification.json.gz\n\n  \
    # Generate a SAM schema into ./out/sam.schema.json\n  \
    cfn-schema-generator --spec ./sam.json --name sam --output ./out")]
struct Cli {
    /// Specification URL or local path (gzip is detected automatically)
    #[arg(short, long, default_value = DEFAULT_SPEC_URL)]
    spec: String,

    /// Schema name, written as <NAME>.schema.json
    #[arg(short, long, default_value = DEFAULT_SCHEMA_NAME)]
    name: String,

    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("{}", "CloudFormation Schema Generator".bold());

    let location = SpecLocation::parse(&cli.spec);
    if cli.verbose {
        println!("  Spec: {}", location);
        println!(
            "  Output: {}",
            cli.output.join(schema_file_name(&cli.name)).display()
        );
    }

    let action = match location {
        SpecLocation::Url(_) => "Downloading",
        SpecLocation::Path(_) => "Reading",
    };
    println!(
        "{} {} CloudFormation Resource Specification...",
        "→".cyan(),
        action
    );
    let source = location.into_source();
    let spec = SpecFetcher::load(source.as_ref()).with_context(|| {
        format!(
            "Failed to load CloudFormation specification from {}",
            cli.spec
        )
    })?;

    println!(
        "{} Loaded specification {}",
        "✓".green(),
        version_label(&spec).yellow()
    );
    if cli.verbose {
        print_summary(&spec);
    }

    println!("{} Generating CloudFormation JSON schema...", "→".cyan());
    let generator = SchemaGenerator::new(spec, &cli.name);
    let path = generator
        .generate_to_directory(&cli.output)
        .context("Failed to generate schema")?;

    println!(
        "\n{} {}",
        "✓ Successfully generated CloudFormation schema:".green().bold(),
        path.display()
    );

    Ok(())
}

fn version_label(spec: &Specification) -> String {
    if spec.resource_specification_version.is_empty() {
        "(unversioned)".to_string()
    } else {
        format!("v{}", spec.resource_specification_version)
    }
}

fn print_summary(spec: &Specification) {
    if !spec.resource_specification_transform.is_empty() {
        println!("  Transform: {}", spec.resource_specification_transform);
    }
    println!("  Resource types: {}", spec.resources.len());
    println!("  Property types: {}", spec.property_types.len());
    if let Some(globals) = &spec.globals {
        println!("  Globals: {}", globals.len());
    }
}
