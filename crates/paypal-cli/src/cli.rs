use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "paypal-provider")]
#[command(about = "Manage PayPal catalog products, subscription plans and webhooks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./paypal.toml when present)
    #[arg(short, long, global = true, env = "PAYPAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the resource kinds this provider manages
    Kinds,
    /// Show the schema of a resource kind
    Schema(KindArgs),
    /// Check a desired-state file against its schema without calling PayPal
    Validate(ValidateArgs),
    /// Create a resource and remember it under an address
    Create(DesiredArgs),
    /// Refresh the observed state of a managed resource
    Read(AddressArgs),
    /// Push desired state to a managed resource
    Update(DesiredArgs),
    /// Delete a managed resource and forget its address
    Delete(AddressArgs),
    /// Adopt an existing remote resource under an address
    Import(ImportArgs),
    /// List managed resources
    List,
    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct KindArgs {
    /// Resource kind (e.g. paypal_catalog_product)
    pub kind: String,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Resource kind (e.g. paypal_subscription_plan)
    pub kind: String,
    /// Path to a JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct AddressArgs {
    /// Resource kind (e.g. paypal_notification_webhook)
    pub kind: String,
    /// Local name of the resource
    pub address: String,
}

#[derive(clap::Args)]
pub struct DesiredArgs {
    /// Resource kind (e.g. paypal_catalog_product)
    pub kind: String,
    /// Local name of the resource
    pub address: String,
    /// Path to a JSON file with the desired state (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ImportArgs {
    /// Resource kind (e.g. paypal_subscription_plan)
    pub kind: String,
    /// Local name to adopt the resource under
    pub address: String,
    /// PayPal ID of the existing resource
    pub id: String,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration with secrets masked
    Show,
}
