//! Common test utilities for integration tests.
//!
//! This module provides reusable fixtures for driving the chat and image
//! clients against a wiremock server or the in-crate mock transport.
//!
//! # Example
//!
//! ```ignore
//! let server = MockServer::start().await;
//! let chat = ChatClient::from_config(chat_config(&server)).unwrap();
//! ```
#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use promptline::chat::Backend;
use promptline::config::ClientConfig;
use promptline::models::ChatMessage;
use wiremock::MockServer;

/// Path the chat flow is mounted at on the mock server.
pub const FLOW_PATH: &str = "/api/v1/run/test-flow";

pub const TEST_API_KEY: &str = "sk-test-key";

/// Config pointing both the chat flow and the image API at `server`.
pub fn chat_config(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_chat_url(format!("{}{}", server.uri(), FLOW_PATH))
        .with_openai_base_url(server.uri())
        .with_openai_api_key(TEST_API_KEY)
}

pub fn json_config(server: &MockServer) -> ClientConfig {
    chat_config(server).with_backend(Backend::JsonReply)
}

/// A short conversation ending with a new user prompt.
pub fn test_history() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("Hi"),
        ChatMessage::assistant("Hello! How can I help?"),
        ChatMessage::user("Say hi back"),
    ]
}

/// Build an event-stream body from payloads, one `data:` event each.
pub fn sse_body(payloads: &[&str]) -> String {
    payloads
        .iter()
        .map(|p| format!("data: {}\n\n", p))
        .collect()
}

/// A streamed chat chunk carrying `content`.
pub fn delta_chunk(content: &str) -> String {
    serde_json::json!({ "choices": [{ "delta": { "content": content } }] }).to_string()
}
