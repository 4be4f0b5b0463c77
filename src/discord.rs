use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

pub const EXAMPLE_WEBHOOK_URL: &str = "https://discord.com/api/webhooks/<id>/<token>";

const WEBHOOK_PATH: &str = "/api/webhooks/";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error(
        "Discord API responded with 405 Method Not Allowed. This usually means the webhook URL \
         is invalid or does not accept POST. Check that DISCORD_WEBHOOK_URL points to a Discord \
         webhook (example: {example})",
        example = EXAMPLE_WEBHOOK_URL
    )]
    MethodNotAllowed,

    #[error("Discord API responded with {}", .0.as_u16())]
    Status(StatusCode),

    #[error("Request to Discord failed")]
    Request(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Whether `url` plausibly points at a Discord incoming webhook.
///
/// Accepts `discord.com` and `discordapp.com` with a path under `/api/webhooks/`,
/// and any host ending in `discord.com` whose path contains `/api/webhooks/`
/// (e.g. `canary.discord.com`). Never panics; unparseable input is simply `false`.
pub fn looks_like_webhook(url: Option<&str>) -> bool {
    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return false;
    };

    let Ok(url) = Url::parse(url) else {
        return false;
    };

    let Some(host) = url.host_str() else {
        return false;
    };
    let path = url.path();

    (host == "discord.com" && path.starts_with(WEBHOOK_PATH))
        || (host == "discordapp.com" && path.starts_with(WEBHOOK_PATH))
        || (host.ends_with("discord.com") && path.contains(WEBHOOK_PATH))
}

pub fn client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(USER_AGENT).build()
}

pub fn send_message(
    client: &Client,
    webhook_url: &Url,
    message: &str,
) -> Result<(), DeliveryError> {
    info!("Sending to Discord: {}", message);

    let result = call_webhook(client, webhook_url, &WebhookMessage { content: message });

    if let Err(e) = &result {
        error!("Failed to send to Discord: {:?}", e);
    }

    result
}

fn call_webhook(
    client: &Client,
    webhook_url: &Url,
    body: &WebhookMessage<'_>,
) -> Result<(), DeliveryError> {
    let response = client.post(webhook_url.clone()).json(body).send()?;

    let status = response.status();
    info!("Discord response status: {}", status.as_u16());

    if status == StatusCode::METHOD_NOT_ALLOWED {
        return Err(DeliveryError::MethodNotAllowed);
    }

    if !status.is_success() {
        return Err(DeliveryError::Status(status));
    }

    Ok(())
}
