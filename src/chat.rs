//! Chat client for the conversational backend.
//!
//! This module sends a conversation to the chat flow endpoint and hands the
//! reply back as a [`FragmentStream`], whether the backend streams events or
//! answers with a single JSON document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::adapters::ReqwestHttpClient;
use crate::cancel::CancelSignal;
use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::models::{serialize_history, ChatMessage, FlowRequest};
use crate::sse::{decode_stream, single_fragment, FragmentStream};
use crate::traits::{Headers, HttpClient};

const EVENT_STREAM: &str = "text/event-stream";
const APPLICATION_JSON: &str = "application/json";

/// JSON pointers tried, in order, on a buffered reply.
const REPLY_TEXT_POINTERS: [&str; 3] = [
    "/choices/0/message/content",
    "/choices/0/text",
    "/outputs/0/outputs/0/results/message/text",
];

/// How the chat backend delivers its reply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Backend {
    /// `data:` events over a long-lived response body
    #[default]
    #[serde(rename = "stream")]
    EventStream,
    /// One JSON document holding the whole reply
    #[serde(rename = "json")]
    JsonReply,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::EventStream => f.write_str("stream"),
            Backend::JsonReply => f.write_str("json"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" | "sse" | "event-stream" => Ok(Backend::EventStream),
            "json" => Ok(Backend::JsonReply),
            other => Err(format!("unknown backend '{}' (expected stream or json)", other)),
        }
    }
}

/// Client for the chat flow endpoint.
pub struct ChatClient<C: HttpClient> {
    config: ClientConfig,
    http: C,
}

impl ChatClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest, honouring the configured timeout.
    pub fn from_config(config: ClientConfig) -> Result<Self, ChatError> {
        let http = ReqwestHttpClient::with_optional_timeout(config.request_timeout())?;
        Ok(Self::new(config, http))
    }
}

impl<C: HttpClient> ChatClient<C> {
    pub fn new(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// Send a conversation and start receiving the reply.
    ///
    /// # Arguments
    /// * `history` - Every turn so far, oldest first, ending with the new prompt
    /// * `cancel` - Stops the request while connecting and while streaming
    ///
    /// # Returns
    /// A stream of fragments ending in `StreamItem::Done`, or the error that
    /// prevented the reply from starting. Errors after that point arrive
    /// through the stream.
    pub async fn send(
        &self,
        history: &[ChatMessage],
        cancel: CancelSignal,
    ) -> ChatResult<FragmentStream> {
        if cancel.is_cancelled() {
            return Err(ChatError::Cancelled);
        }

        let streaming = self.config.backend == Backend::EventStream;
        let request = FlowRequest::new(serialize_history(history), streaming);
        let body = serde_json::to_string(&request)
            .map_err(|e| ChatError::InvalidResponse(format!("request encoding failed: {}", e)))?;

        info!(
            url = %self.config.chat_url,
            backend = %self.config.backend,
            turns = history.len(),
            "sending chat request"
        );

        match self.config.backend {
            Backend::EventStream => self.send_streaming(&body, cancel).await,
            Backend::JsonReply => self.send_buffered(&body, cancel).await,
        }
    }

    async fn send_streaming(
        &self,
        body: &str,
        cancel: CancelSignal,
    ) -> ChatResult<FragmentStream> {
        let headers = self.headers(EVENT_STREAM);

        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("chat request cancelled before the stream opened");
                return Err(ChatError::Cancelled);
            }
            result = self.http.post_stream(&self.config.chat_url, body, &headers) => result?,
        };

        debug!("event stream opened");
        Ok(decode_stream(bytes, cancel))
    }

    async fn send_buffered(
        &self,
        body: &str,
        cancel: CancelSignal,
    ) -> ChatResult<FragmentStream> {
        let headers = self.headers(APPLICATION_JSON);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("chat request cancelled while awaiting the reply");
                return Err(ChatError::Cancelled);
            }
            result = self.http.post(&self.config.chat_url, body, &headers) => result?,
        };

        if !response.is_success() {
            return Err(ChatError::Status {
                status: response.status,
                body: response.text_lossy(),
            });
        }

        let text = extract_reply_text(&response.text_lossy());
        debug!(has_text = text.is_some(), "buffered reply received");
        Ok(single_fragment(text))
    }

    fn headers(&self, accept: &str) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), APPLICATION_JSON.to_string());
        headers.insert("Accept".to_string(), accept.to_string());
        if let Some(key) = &self.config.chat_api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        headers
    }
}

/// Pull the reply text out of a buffered JSON reply.
///
/// Falls back to the raw body when it is not JSON or carries the text
/// somewhere unexpected. An empty body or empty text yields `None`.
pub fn extract_reply_text(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return Some(body.to_string()).filter(|b| !b.is_empty());
    };

    let found = REPLY_TEXT_POINTERS
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(|v| v.as_str()));

    match found {
        Some(text) => Some(text.to_string()).filter(|t| !t.is_empty()),
        None => Some(body.to_string()).filter(|b| !b.is_empty()),
    }
}
