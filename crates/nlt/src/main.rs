mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nlt_api::Client;
use nlt_config::Overrides;

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = build_client(&cli.global).await?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    let result = commands::dispatch(cli.command, &client, &cli.global).await;

    client.stop().await;
    result
}

/// Build a `Client` from the config file, profile, and CLI overrides.
///
/// Auto-login is forced off: each invocation logs in exactly once before
/// its request, so no background refresher is needed.
async fn build_client(global: &GlobalOpts) -> Result<Client, CliError> {
    let cfg = nlt_config::load_config()?;
    let profile_name = nlt_config::active_profile_name(global.profile.as_deref(), &cfg);

    let overrides = Overrides {
        base_url: global.base_url.clone(),
        email: global.email.clone(),
        timeout_secs: global.timeout,
        auto_login: Some(false),
    };
    let (config, credentials) = nlt_config::resolve(&cfg, &profile_name, &overrides)?;

    tracing::debug!(profile = %profile_name, base_url = %config.base_url, "resolved profile");
    Ok(Client::new(config, credentials).await?)
}
