pub mod config;
pub mod resource;
pub mod schema;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use paypal_core::{AttributeMap, attributes_from_str};

/// Reads a desired-state tree from `file`, or stdin when no file is given.
fn read_desired(file: Option<&Path>) -> Result<AttributeMap> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    attributes_from_str(&content).context("Invalid desired state")
}
