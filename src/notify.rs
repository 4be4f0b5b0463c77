use crate::config::Config;
use crate::discord::{self, DeliveryError};
use crate::patchnotes::{self, Patchnote};
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Unable to read patchnote `{file}`")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to send patchnote `{file}`")]
    Deliver {
        file: String,
        #[source]
        source: DeliveryError,
    },
}

pub fn notify(
    client: &Client,
    config: &Config,
    patchnote: &Patchnote,
) -> Result<(), DeliveryError> {
    discord::send_message(client, &config.webhook_url, &patchnote.message())
}

/// Sends every patchnote in the configured directory, one at a time.
///
/// Stops at the first file that can't be read or delivered; anything sent
/// before that stays sent. Returns how many patchnotes were delivered.
pub fn notify_all(client: &Client, config: &Config) -> Result<usize, NotifyError> {
    let files = patchnotes::find_patchnotes(&config.patchnotes_dir);

    info!(
        "Found {} patchnotes in {}",
        files.len(),
        config.patchnotes_dir.display()
    );

    for file in &files {
        let patchnote =
            Patchnote::read(&config.patchnotes_dir, file).map_err(|source| NotifyError::Read {
                file: file.clone(),
                source,
            })?;

        notify(client, config, &patchnote).map_err(|source| NotifyError::Deliver {
            file: file.clone(),
            source,
        })?;
    }

    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use reqwest::Url;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const HOOK_PATH: &str = "/api/webhooks/1/token";

    fn config(server: &mockito::Server, dir: &Path) -> Config {
        Config {
            webhook_url: Url::parse(&format!("{}{}", server.url(), HOOK_PATH)).unwrap(),
            patchnotes_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_sends_each_patchnote() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("x.md"), "hello").unwrap();
        fs::write(tmp.path().join("y.md"), "world").unwrap();
        fs::write(tmp.path().join("ignored.txt"), "nope").unwrap();

        let mut server = mockito::Server::new();
        let x = server
            .mock("POST", HOOK_PATH)
            .match_body(Matcher::Json(json!({
                "content": "**New Patchnote**: x.md\n\nhello"
            })))
            .with_status(200)
            .create();
        let y = server
            .mock("POST", HOOK_PATH)
            .match_body(Matcher::Json(json!({
                "content": "**New Patchnote**: y.md\n\nworld"
            })))
            .with_status(200)
            .create();

        let client = discord::client().unwrap();
        let sent = notify_all(&client, &config(&server, tmp.path())).unwrap();

        assert_eq!(sent, 2);
        x.assert();
        y.assert();
    }

    #[test]
    fn test_stops_at_first_failure() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "first").unwrap();
        fs::write(tmp.path().join("b.md"), "second").unwrap();

        let mut server = mockito::Server::new();
        let first = server
            .mock("POST", HOOK_PATH)
            .match_body(Matcher::Regex("first".to_string()))
            .with_status(500)
            .expect(1)
            .create();
        let second = server
            .mock("POST", HOOK_PATH)
            .match_body(Matcher::Regex("second".to_string()))
            .with_status(200)
            .expect(0)
            .create();

        let client = discord::client().unwrap();
        let err = notify_all(&client, &config(&server, tmp.path())).unwrap_err();

        match err {
            NotifyError::Deliver { file, source } => {
                assert_eq!(file, "a.md");
                assert!(matches!(source, DeliveryError::Status(s) if s.as_u16() == 500));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        first.assert();
        second.assert();
    }

    #[test]
    fn test_missing_directory_sends_nothing() {
        let tmp = TempDir::new().unwrap();

        let mut server = mockito::Server::new();
        let mock = server.mock("POST", Matcher::Any).expect(0).create();

        let client = discord::client().unwrap();
        let sent = notify_all(&client, &config(&server, &tmp.path().join("missing"))).unwrap();

        assert_eq!(sent, 0);
        mock.assert();
    }

    #[test]
    fn test_invalid_utf8_patchnote_is_still_sent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), [b'h', b'i', 0xff]).unwrap();

        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", HOOK_PATH)
            .match_body(Matcher::Json(json!({
                "content": "**New Patchnote**: a.md\n\nhi\u{FFFD}"
            })))
            .with_status(204)
            .expect(1)
            .create();

        let client = discord::client().unwrap();
        let sent = notify_all(&client, &config(&server, tmp.path())).unwrap();

        assert_eq!(sent, 1);
        mock.assert();
    }

    #[test]
    fn test_unreadable_patchnote_stops_the_run() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("a.md")).unwrap();
        fs::write(tmp.path().join("b.md"), "second").unwrap();

        let mut server = mockito::Server::new();
        let mock = server.mock("POST", HOOK_PATH).expect(0).create();

        let client = discord::client().unwrap();
        let err = notify_all(&client, &config(&server, tmp.path())).unwrap_err();

        assert!(matches!(err, NotifyError::Read { ref file, .. } if file == "a.md"));
        mock.assert();
    }
}
