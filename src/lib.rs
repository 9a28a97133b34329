//! promptline - a streaming chat and image client
//!
//! Sends conversations to a chat flow backend and relays the reply as it
//! streams in, and drives an OpenAI-compatible image API.

pub mod adapters;
pub mod cancel;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod images;
pub mod models;
pub mod sse;
pub mod traits;
