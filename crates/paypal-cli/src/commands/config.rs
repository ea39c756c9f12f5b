use anyhow::Result;
use colored::Colorize;
use paypal_config::ProviderConfig;

use crate::output::print_warning;

pub fn show(config: &ProviderConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    println!();
    match config.require_credentials() {
        Ok((client_id, _)) => println!("{}: configured for {}", "Credentials".cyan(), client_id),
        Err(e) => print_warning(&e.to_string()),
    }
    if config.is_sandbox_endpoint() {
        println!("{}: sandbox", "Endpoint".cyan());
    }
    Ok(())
}
