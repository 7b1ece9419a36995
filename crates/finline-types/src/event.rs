//! LINE webhook event model.
//!
//! Deserialization targets for the JSON the platform POSTs to the callback
//! endpoint. Only the shapes Finline consumes are modeled; unknown event,
//! source, and message kinds fall through to catch-all variants so a new
//! platform feature never breaks envelope parsing.

use serde::{Deserialize, Serialize};

/// Top-level webhook payload: one request carries a batch of events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A single webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Message(MessageEvent),
    Postback(PostbackEvent),
    #[serde(other)]
    Unknown,
}

/// A message event: someone sent something into a chat we are in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub reply_token: String,
    pub source: EventSource,
    pub message: MessageContent,
}

/// A postback event from an interactive template action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostbackEvent {
    pub source: EventSource,
    pub postback: PostbackContent,
}

/// Postback payload data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostbackContent {
    pub data: String,
}

/// Where an event originated: a 1:1 chat, a group, or a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EventSource {
    User { user_id: String },
    Group {
        group_id: String,
        user_id: Option<String>,
    },
    Room {
        room_id: String,
        user_id: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// The message body carried by a [`MessageEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: String },
    #[serde(other)]
    Unsupported,
}
