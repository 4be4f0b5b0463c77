use crate::discord;
use reqwest::Url;
use std::path::PathBuf;
use thiserror::Error;

const WEBHOOK_VAR: &str = "DISCORD_WEBHOOK_URL";
const PATCHNOTES_DIR_VAR: &str = "PATCHNOTES_DIR";
pub const DEFAULT_PATCHNOTES_DIR: &str = "docs/patchnotes";

#[derive(Debug)]
pub struct Config {
    pub webhook_url: Url,
    pub patchnotes_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DISCORD_WEBHOOK_URL is not set")]
    Missing,

    #[error(
        "DISCORD_WEBHOOK_URL does not look like a Discord webhook URL: {0}\n\
         Please set DISCORD_WEBHOOK_URL to a valid webhook, for example: {example}",
        example = discord::EXAMPLE_WEBHOOK_URL
    )]
    NotAWebhook(String),
}

pub fn get_config() -> Result<Config, ConfigError> {
    get_config_from(|key| std::env::var(key).ok())
}

/// Builds the run configuration from an arbitrary variable source.
///
/// Nothing is read from disk and no request is made here: an invalid
/// webhook URL stops the run before any I/O happens.
pub fn get_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let webhook = lookup(WEBHOOK_VAR)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing)?;

    if !discord::looks_like_webhook(Some(&webhook)) {
        return Err(ConfigError::NotAWebhook(webhook));
    }

    // Already parsed once by the validator, so this can't fail in practice.
    let webhook_url =
        Url::parse(&webhook).map_err(|_| ConfigError::NotAWebhook(webhook.clone()))?;

    let patchnotes_dir = lookup(PATCHNOTES_DIR_VAR)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_PATCHNOTES_DIR), PathBuf::from);

    Ok(Config {
        webhook_url,
        patchnotes_dir,
    })
}
