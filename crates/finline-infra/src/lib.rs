//! Infrastructure implementations for Finline.
//!
//! Concrete implementations of the collaborator traits defined in
//! finline-core: the Groq completion provider, the market-data lookup
//! suite, the companion persona, plus the LINE platform client (signature
//! verification and reply delivery) and environment configuration.

pub mod config;
pub mod line;
pub mod llm;
pub mod lookup;
pub mod persona;
