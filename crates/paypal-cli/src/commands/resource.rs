use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use paypal_resources::{DeleteOutcome, HostAdapter};

use super::read_desired;
use crate::cli::OutputFormat;
use crate::output::{print_observed, print_states, print_success, print_warning};

pub async fn create(
    adapter: &HostAdapter,
    kind: &str,
    address: &str,
    file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let desired = read_desired(file)?;
    let observed = adapter.create(kind, address, &desired).await?;
    print_success(&format!("Created {} {}", address.cyan(), observed.id.cyan()));
    print_observed(&observed, format)
}

pub async fn read(adapter: &HostAdapter, kind: &str, address: &str, format: OutputFormat) -> Result<()> {
    let observed = adapter.read(kind, address).await?;
    print_observed(&observed, format)
}

pub async fn update(
    adapter: &HostAdapter,
    kind: &str,
    address: &str,
    file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let desired = read_desired(file)?;
    let outcome = adapter.update(kind, address, &desired).await?;
    if outcome.is_noop() {
        print_success(&format!("{} is up to date", address.cyan()));
    } else {
        let paths: Vec<&str> = outcome.changes.iter().map(|c| c.path.as_str()).collect();
        print_success(&format!("Updated {} ({})", address.cyan(), paths.join(", ")));
    }
    print_observed(&outcome.observed, format)
}

pub async fn delete(adapter: &HostAdapter, kind: &str, address: &str) -> Result<()> {
    let outcome = adapter.delete(kind, address).await?;
    match outcome {
        DeleteOutcome::Deleted => print_success(&format!("Deleted {}", address.cyan())),
        DeleteOutcome::SoftDeleted => print_warning(&format!(
            "{} cannot be deleted by PayPal; it was marked as removed and released",
            address
        )),
        DeleteOutcome::Deactivated => {
            print_success(&format!("Deactivated {} and released it", address.cyan()))
        }
    }
    Ok(())
}

pub async fn import(
    adapter: &HostAdapter,
    kind: &str,
    address: &str,
    id: &str,
    format: OutputFormat,
) -> Result<()> {
    let observed = adapter.import(kind, address, id).await?;
    print_success(&format!("Imported {} as {}", id.cyan(), address.cyan()));
    print_observed(&observed, format)
}

pub async fn list(adapter: &HostAdapter, format: OutputFormat) -> Result<()> {
    let states = adapter.list().await?;
    print_states(&states, format)
}
