mod cli;
mod commands;
mod observability;
mod output;
mod runtime;
mod state;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;
use runtime::Runtime;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    let config =
        paypal_config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    observability::init_tracing(&config.logging.level);

    if let Commands::Config(args) = &cli.command {
        return match args.command {
            cli::ConfigCommands::Show => commands::config::show(&config),
        };
    }

    let runtime = Runtime::open(&config).await?;
    let adapter = &runtime.adapter;
    let result = match &cli.command {
        Commands::Kinds => commands::schema::kinds(adapter.registry(), format),
        Commands::Schema(args) => commands::schema::schema(adapter.registry(), &args.kind, format),
        Commands::Validate(args) => {
            commands::schema::validate(adapter.registry(), &args.kind, args.file.as_deref())
        }
        Commands::Create(args) => {
            commands::resource::create(adapter, &args.kind, &args.address, args.file.as_deref(), format)
                .await
        }
        Commands::Read(args) => {
            commands::resource::read(adapter, &args.kind, &args.address, format).await
        }
        Commands::Update(args) => {
            commands::resource::update(adapter, &args.kind, &args.address, args.file.as_deref(), format)
                .await
        }
        Commands::Delete(args) => commands::resource::delete(adapter, &args.kind, &args.address).await,
        Commands::Import(args) => {
            commands::resource::import(adapter, &args.kind, &args.address, &args.id, format).await
        }
        Commands::List => commands::resource::list(adapter, format).await,
        Commands::Config(_) => Ok(()),
    };

    // Remote state changes even when a later step fails, so always persist it.
    runtime.close()?;
    result
}
