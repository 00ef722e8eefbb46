mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use albumkit_core::{ClientConfig, Session};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "albumkit", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let session = Session::new(build_client_config(&cli.global)?)?;

            tracing::debug!(command = ?cmd, url = %session.config().base_url, "dispatching command");
            commands::dispatch(cmd, &session, &cli.global).await
        }
    }
}

/// Resolve settings from the config file and environment, then apply
/// `--server` and `--timeout`. An explicit `--server` replaces the
/// configured server section entirely.
fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(albumkit_config::config_path);
    let settings = albumkit_config::load_settings_from(&path)?;

    let mut config = match global.server {
        Some(ref server) => {
            let url = server.parse().map_err(|_| CliError::Validation {
                field: "server".into(),
                reason: format!("invalid URL: {server}"),
            })?;
            settings.client_config_for(url)
        }
        None => settings.to_client_config()?,
    };

    if let Some(ms) = global.timeout {
        config.timeout = Duration::from_millis(ms);
    }
    Ok(config)
}
