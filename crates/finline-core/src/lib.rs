//! Business logic for Finline.
//!
//! Pure dispatch/state machinery with no I/O of its own: the ordered intent
//! classifier, the per-chat conversation store, and the dispatcher that maps
//! intents onto collaborator traits. Implementations of the collaborator
//! traits ([`dispatch::LlmProvider`], [`dispatch::MarketData`],
//! [`dispatch::PersonaReplies`]) live in finline-infra.

pub mod classify;
pub mod conversation;
pub mod dispatch;
