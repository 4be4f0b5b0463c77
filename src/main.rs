use anyhow::Context;
use std::process::ExitCode;
use tracing::{error, info};

mod config;
mod discord;
mod log;
mod notify;
mod patchnotes;

fn main() -> ExitCode {
    // A missing .env is fine; the environment may already be populated.
    _ = dotenvy::dotenv();

    log::init();

    let config = match config::get_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Posting patchnotes from {} to {}",
        config.patchnotes_dir.display(),
        config.webhook_url.host_str().unwrap_or("<no host>")
    );

    match run(&config) {
        Ok(sent) => {
            info!("Sent {} patchnotes", sent);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &config::Config) -> anyhow::Result<usize> {
    let client = discord::client().context("Unable to build HTTP client")?;

    let sent = notify::notify_all(&client, config)?;

    Ok(sent)
}
