//! Configuration validation command.

use std::path::Path;

use crate::error::Result;
use crate::infrastructure::bootstrap::{build_modules, Collaborators};
use crate::infrastructure::config::settings::{Config, API_PASSWORD_ENV};

/// Validate the configuration file without starting anything and print the
/// settings of every enabled module.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    println!();

    let config = Config::load(path)?;
    let collaborators = Collaborators::from_config(&config)?;
    let modules = build_modules(&config.modules, &collaborators)?;

    println!("✓ Configuration file is valid");
    println!();
    println!("Summary:");
    println!("  Daemon: {}", config.host);
    if config.api_password.is_some() {
        println!("  API password: set");
    } else {
        println!("  ⚠ No API password (set api-password or {API_PASSWORD_ENV})");
    }

    if modules.is_empty() {
        println!("  ⚠ No modules enabled");
    }
    for module in &modules {
        println!();
        println!("[{}]", module.name());
        for line in module.describe_settings() {
            println!("  {line}");
        }
    }

    println!();
    println!("Configuration is ready to use.");
    Ok(())
}
