use clap::Parser;
use lazyhost::cli::{self, CheckCommand, Cli, Commands, RunArgs};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::run::execute(&RunArgs::default()).await,
        Some(Commands::Run(args)) => cli::run::execute(&args).await,
        Some(Commands::Check(CheckCommand::Config(arg))) => cli::check::execute_config(&arg.config),
    };

    if let Err(e) = result {
        cli::report_error(&e);
        std::process::exit(1);
    }
}
