//! Bounded in-memory conversation store.
//!
//! One entry per chat id, each holding the recent turn history and the
//! active persona. Backed by `DashMap`, so independent chats never contend
//! and same-chat mutation is serialized per key. State is process-local;
//! a restart starts every chat fresh.

use dashmap::DashMap;

use finline_types::chat::{ChatId, Persona, Turn};
use finline_types::llm::MessageRole;

/// Number of recent turns handed to the completion service as context.
pub const MAX_HISTORY_LEN: usize = 10;

/// Hard cap on stored turns per chat; the oldest are dropped first.
const HISTORY_CAP: usize = MAX_HISTORY_LEN * 2;

#[derive(Debug, Default)]
struct SessionState {
    history: Vec<Turn>,
    persona: Persona,
}

/// Process-wide map from chat id to conversation state.
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: DashMap<ChatId, SessionState>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Initialize an empty history and base persona for a chat if absent.
    pub fn ensure(&self, chat_id: &str) {
        self.sessions
            .entry(chat_id.to_string())
            .or_default();
    }

    /// Append a turn, dropping the oldest turns beyond the cap.
    pub fn append_turn(&self, chat_id: &str, role: MessageRole, content: &str) {
        let mut entry = self
            .sessions
            .entry(chat_id.to_string())
            .or_default();
        entry.history.push(Turn::new(role, content));
        let len = entry.history.len();
        if len > HISTORY_CAP {
            entry.history.drain(..len - HISTORY_CAP);
        }
    }

    /// The last `n` turns for a chat, oldest first.
    pub fn recent(&self, chat_id: &str, n: usize) -> Vec<Turn> {
        self.sessions
            .get(chat_id)
            .map(|entry| {
                let history = &entry.history;
                history[history.len().saturating_sub(n)..].to_vec()
            })
            .unwrap_or_default()
    }

    /// The full (capped) history for a chat, oldest first.
    pub fn history(&self, chat_id: &str) -> Vec<Turn> {
        self.sessions
            .get(chat_id)
            .map(|entry| entry.history.clone())
            .unwrap_or_default()
    }

    /// The active persona for a chat (base if the chat is unknown).
    pub fn persona(&self, chat_id: &str) -> Persona {
        self.sessions
            .get(chat_id)
            .map(|entry| entry.persona)
            .unwrap_or_default()
    }

    /// Switch the active persona for a chat.
    pub fn set_persona(&self, chat_id: &str, persona: Persona) {
        let mut entry = self
            .sessions
            .entry(chat_id.to_string())
            .or_default();
        entry.persona = persona;
    }

    /// Number of chats currently tracked.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
