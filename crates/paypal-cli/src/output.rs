use anyhow::Result;
use colored::Colorize;
use paypal_core::{BlockSchema, FieldSchema, FieldType, ResourceSchema};
use paypal_resources::{ObservedResource, StoredState};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_observed(observed: &ObservedResource, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(observed),
        OutputFormat::Table => {
            println!("{} {}", "ID:".cyan(), observed.id.cyan());
            let mut builder = Builder::default();
            builder.push_record(["Attribute", "Value"]);
            for (name, value) in &observed.attributes {
                builder.push_record([name.clone(), serde_json::to_string(value)?]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            Ok(())
        }
    }
}

pub fn print_states(states: &[StoredState], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&states),
        OutputFormat::Table => {
            if states.is_empty() {
                println!("No managed resources.");
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(["Address", "Kind", "ID"]);
            for state in states {
                builder.push_record([state.address.as_str(), state.kind.as_str(), state.id.as_str()]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            println!("Total: {}", states.len());
            Ok(())
        }
    }
}

pub fn print_schema(schema: &ResourceSchema, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(schema),
        OutputFormat::Table => {
            println!("{} {}", schema.kind.as_str().cyan(), schema.description);
            let mut builder = Builder::default();
            builder.push_record(["Attribute", "Type", "Presence", "Constraints"]);
            push_block(&mut builder, &schema.fields, "");
            println!("{}", builder.build().with(Style::rounded()));
            Ok(())
        }
    }
}

fn push_block(builder: &mut Builder, block: &BlockSchema, prefix: &str) {
    for (name, field) in block.fields() {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        let type_name = match &field.field_type {
            FieldType::Scalar(kind) => kind.name().to_string(),
            FieldType::List(kind) => format!("list({})", kind.name()),
            FieldType::Block(_) => "block".to_string(),
        };
        builder.push_record([
            path.clone(),
            type_name,
            format!("{:?}", field.presence).to_lowercase(),
            constraints(field),
        ]);
        if let Some(nested) = field.nested() {
            push_block(builder, nested, &path);
        }
    }
}

fn constraints(field: &FieldSchema) -> String {
    let mut parts = Vec::new();
    if let Some(min) = field.min_items {
        parts.push(format!("min {min}"));
    }
    if let Some(max) = field.max_items {
        parts.push(format!("max {max}"));
    }
    if let Some(values) = &field.allowed_values {
        parts.push(format!("one of {}", values.join("|")));
    }
    if let Some(range) = &field.range {
        parts.push(format!("{}..={}", range.min, range.max));
    }
    if field.non_empty {
        parts.push("non-empty".to_string());
    }
    if field.ignore_case {
        parts.push("case-insensitive".to_string());
    }
    if field.equivalence.is_some() {
        parts.push("numeric".to_string());
    }
    parts.join(", ")
}
