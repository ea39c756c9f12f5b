use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;
use paypal_resources::ResourceRegistry;
use tabled::builder::Builder;
use tabled::settings::Style;

use super::read_desired;
use crate::cli::OutputFormat;
use crate::output::{print_error, print_json, print_schema, print_success};

pub fn kinds(registry: &ResourceRegistry, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let names: Vec<&str> = registry.kinds().map(|kind| kind.as_str()).collect();
            print_json(&names)
        }
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Kind", "Description"]);
            for kind in registry.kinds() {
                let (schema, _) = registry.resolve_kind(kind)?;
                builder.push_record([kind.as_str(), schema.description.as_str()]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            Ok(())
        }
    }
}

pub fn schema(registry: &ResourceRegistry, kind: &str, format: OutputFormat) -> Result<()> {
    let (schema, _) = registry.resolve(kind)?;
    print_schema(schema, format)
}

pub fn validate(registry: &ResourceRegistry, kind: &str, file: Option<&Path>) -> Result<()> {
    let (schema, _) = registry.resolve(kind)?;
    let desired = read_desired(file)?;

    let result = schema.validate(&desired);
    if result.is_valid() {
        print_success(&format!("Valid {}", kind.cyan()));
        return Ok(());
    }
    for issue in &result.issues {
        print_error(&issue.to_string());
    }
    bail!("{} issue(s) found", result.issues.len())
}
