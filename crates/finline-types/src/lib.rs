//! Shared domain types for Finline.
//!
//! This crate contains the core domain types used across the Finline bot:
//! chat turns and personas, the LINE webhook event model, intent tags, LLM
//! request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod event;
pub mod intent;
pub mod llm;
