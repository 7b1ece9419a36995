//! LINE webhook receiver.
//!
//! Verifies the `X-Line-Signature` header against the raw body before any
//! parsing, then handles each event in the envelope synchronously. Reply
//! delivery failure is logged and swallowed; the conversation state has
//! already been updated by the dispatcher at that point.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use secrecy::ExposeSecret;
use tracing::{debug, error, info, warn};

use finline_core::conversation::resolve_chat_id;
use finline_infra::line::signature::verify_signature;
use finline_types::event::{Event, MessageContent, MessageEvent, WebhookEnvelope};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/callback - LINE webhook endpoint.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadSignature("missing X-Line-Signature header".to_string()))?;

    verify_signature(
        state.channel_secret.expose_secret().as_bytes(),
        &body,
        signature,
    )
    .map_err(|e| AppError::BadSignature(e.to_string()))?;

    let envelope: WebhookEnvelope =
        serde_json::from_slice(&body).map_err(|e| AppError::BadPayload(e.to_string()))?;

    for event in envelope.events {
        match event {
            Event::Message(message_event) => handle_message_event(&state, message_event).await,
            Event::Postback(postback_event) => {
                debug!(data = %postback_event.postback.data, "postback event");
            }
            Event::Unknown => debug!("ignoring unrecognized event kind"),
        }
    }

    Ok("OK")
}

/// Dispatch one text message and deliver the reply.
async fn handle_message_event(state: &AppState, event: MessageEvent) {
    let MessageContent::Text { text } = event.message else {
        debug!("ignoring non-text message");
        return;
    };

    let Some(chat_id) = resolve_chat_id(&event.source) else {
        warn!("unrecognized chat scope, dropping message");
        return;
    };

    let start = Instant::now();
    let reply = state.dispatcher.handle_message(&chat_id, &text).await;
    info!(
        chat_id = %chat_id,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "message handled"
    );

    if let Err(err) = state.line.reply(&event.reply_token, &reply).await {
        error!(error = %err, "LINE 回覆失敗");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use secrecy::SecretString;

    use finline_infra::config::Config;
    use finline_infra::line::signature::compute_signature;

    const TEST_SECRET: &str = "test-channel-secret";

    fn test_state() -> AppState {
        AppState::init(Config {
            line_base_url: "http://localhost:1".to_string(),
            channel_access_token: SecretString::from("test-token"),
            channel_secret: SecretString::from(TEST_SECRET),
            groq_api_key: SecretString::from("gsk-test"),
            stock_names_path: PathBuf::from("/nonexistent/name_df.csv"),
        })
    }

    fn signed_headers(body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let signature = compute_signature(TEST_SECRET.as_bytes(), body).unwrap();
        headers.insert("x-line-signature", signature.parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let result = callback(
            State(test_state()),
            HeaderMap::new(),
            Bytes::from_static(b"{}"),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadSignature(_))));
    }

    #[tokio::test]
    async fn wrong_signature_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("x-line-signature", "ZGVhZGJlZWY=".parse().unwrap());
        let result = callback(State(test_state()), headers, Bytes::from_static(b"{}")).await;
        assert!(matches!(result, Err(AppError::BadSignature(_))));
    }

    #[tokio::test]
    async fn unparsable_payload_is_rejected() {
        let body = b"not json";
        let result = callback(
            State(test_state()),
            signed_headers(body),
            Bytes::from_static(body),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadPayload(_))));
    }

    #[tokio::test]
    async fn postback_only_envelope_is_acknowledged() {
        let body = br#"{"events":[{"type":"postback","source":{"type":"user","userId":"U1"},"postback":{"data":"action=ping"}}]}"#;
        let result = callback(
            State(test_state()),
            signed_headers(body),
            Bytes::from_static(body),
        )
        .await;
        assert_eq!(result.unwrap(), "OK");
    }

    #[tokio::test]
    async fn unknown_scope_is_dropped_without_error() {
        let body = br#"{"events":[{"type":"message","replyToken":"r1","source":{"type":"multiperson"},"message":{"type":"text","text":"hi"}}]}"#;
        let result = callback(
            State(test_state()),
            signed_headers(body),
            Bytes::from_static(body),
        )
        .await;
        assert_eq!(result.unwrap(), "OK");
    }
}
