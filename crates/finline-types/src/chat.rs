//! Chat turn and persona types for Finline.
//!
//! A conversation is a bounded sequence of [`Turn`]s keyed by a chat id
//! (user, group, or room scope). Each chat additionally carries a
//! [`Persona`] that selects how fallback messages are answered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

// Re-export MessageRole from the llm module (turns and LLM messages share it).
pub use crate::llm::MessageRole;

/// Stable identifier for one chat scope (user, group, or room).
///
/// The value is whatever id the platform hands us for that scope; Finline
/// never synthesizes its own.
pub type ChatId = String;

/// One exchange entry in a conversation: who said it and what was said.
///
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Reply personality active for a chat.
///
/// `Base` answers through the windowed completion fallback; `Companion`
/// routes fallback messages to the companion persona handler until the
/// exit trigger is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Base,
    Companion,
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persona::Base => write!(f, "base"),
            Persona::Companion => write!(f, "companion"),
        }
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(Persona::Base),
            "companion" => Ok(Persona::Companion),
            other => Err(format!("invalid persona: '{other}'")),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Persona::Base
    }
}
