//! LINE Messaging API client.
//!
//! Reply delivery via the reply endpoint, plus webhook signature
//! verification in [`signature`]. Delivery failure is the caller's
//! decision to tolerate; this client only reports it.

pub mod signature;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Errors from reply delivery.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("LINE returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Serialize)]
struct ReplyRequest<'a> {
    #[serde(rename = "replyToken")]
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Client for the LINE reply API.
///
/// Constructed once at startup and reused for the process lifetime.
pub struct LineClient {
    http: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

// LineClient intentionally does NOT derive Debug to prevent accidental
// exposure of the channel access token.

impl LineClient {
    pub fn new(base_url: impl Into<String>, access_token: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create reqwest client");

        Self {
            http,
            base_url: base_url.into(),
            access_token,
        }
    }

    /// Send one text message through the reply endpoint.
    ///
    /// Reply tokens are single-use and short-lived; a late or repeated
    /// reply surfaces as a `Status` error from the platform.
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<(), ReplyError> {
        let url = format!("{}/v2/bot/message/reply", self.base_url);
        let body = ReplyRequest {
            reply_token,
            messages: vec![TextMessage { kind: "text", text }],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ReplyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
