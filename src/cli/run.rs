//! Handler for the `run` command.

use tracing::info;

use crate::cli::RunArgs;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::runtime;

/// Load the configuration, start the supervisor and block until Ctrl+C.
///
/// Configuration errors are returned before anything starts.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    config.logging = config
        .logging
        .clone()
        .with_overrides(args.log_level.as_deref(), args.json_logs);
    config.init_logging();

    info!(
        config = %args.config.display(),
        host = %config.host,
        modules = ?config.modules.names(),
        "lazyhost starting"
    );

    runtime::run(&config).await?;

    info!("lazyhost stopped");
    Ok(())
}
