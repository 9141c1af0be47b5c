//! Chat webhook notifications.

use crate::error::NotifyError;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::debug;

/// JSON body posted to the webhook.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NotificationPayload<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

/// Posts `text` to `channel` through the incoming webhook at `webhook_url`.
///
/// One attempt, no retry. Any non-success status is an error.
pub fn notify(
    client: &Client,
    text: &str,
    webhook_url: &str,
    channel: &str,
) -> Result<(), NotifyError> {
    let payload = NotificationPayload { channel, text };

    let response = client
        .post(webhook_url)
        .json(&payload)
        .send()
        .map_err(|source| NotifyError::Request { source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(NotifyError::Status {
            status: status.as_u16(),
        });
    }

    debug!(%channel, bytes = text.len(), "notification sent");
    Ok(())
}
