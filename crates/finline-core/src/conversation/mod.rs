//! Per-chat conversation state: identity resolution and the bounded store.

pub mod store;

pub use store::{ConversationStore, MAX_HISTORY_LEN};

use finline_types::chat::ChatId;
use finline_types::event::EventSource;

/// Resolve an event source to its stable chat id.
///
/// One id per scope: the user id for 1:1 chats, the group id for groups,
/// the room id for rooms. Unrecognized scopes resolve to `None` and the
/// message is dropped by the caller.
pub fn resolve_chat_id(source: &EventSource) -> Option<ChatId> {
    match source {
        EventSource::User { user_id } => Some(user_id.clone()),
        EventSource::Group { group_id, .. } => Some(group_id.clone()),
        EventSource::Room { room_id, .. } => Some(room_id.clone()),
        EventSource::Unknown => None,
    }
}
