//! Process runtime: wire modules, supervise them, wait for shutdown.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use super::bootstrap::{build_modules, Collaborators};
use super::config::settings::{Config, API_PASSWORD_ENV};
use crate::application::{Module, Supervisor};
use crate::error::Result;

/// Log every module's settings, one line each.
pub fn print_settings(modules: &[Arc<dyn Module>]) {
    for module in modules {
        for line in module.describe_settings() {
            info!(module = module.name(), "{line}");
        }
    }
}

/// Run until `shutdown` resolves.
///
/// # Errors
/// Only wiring errors, before any module has started.
pub async fn run_with_shutdown(config: &Config, shutdown: impl Future<Output = ()>) -> Result<()> {
    if config.api_password.is_none() {
        warn!(
            env = API_PASSWORD_ENV,
            "No API password configured, requests to the daemon may be rejected"
        );
    }

    let collaborators = Collaborators::from_config(config)?;
    let modules = build_modules(&config.modules, &collaborators)?;
    if modules.is_empty() {
        warn!("No modules enabled, nothing to do");
    }
    print_settings(&modules);

    info!(modules = modules.len(), "Modules initialized. Starting...");
    let handle = Supervisor::new(modules).start();

    shutdown.await;
    info!("Shutdown signal received");
    handle.shutdown().await;
    Ok(())
}

/// Run until Ctrl+C.
pub async fn run(config: &Config) -> Result<()> {
    run_with_shutdown(config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl+C, running until killed");
            std::future::pending::<()>().await;
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::config::MINIMAL_TOML;

    #[tokio::test]
    async fn returns_once_shutdown_resolves() {
        let config = Config::parse_toml(MINIMAL_TOML).unwrap();
        run_with_shutdown(&config, async {}).await.unwrap();
    }
}
