//! Payload resolution policy.

use crate::sse::events::{Payload, DONE_SENTINEL};
use crate::sse::payloads::ChunkPayload;

/// Decide what a single `data:` payload contributes to the fragment stream.
///
/// In priority order: the sentinel ends the stream; a JSON chunk yields the
/// text at `choices[0].delta.content` or `choices[0].text`; anything else is
/// passed through verbatim. Empty text never becomes a fragment.
pub fn resolve_payload(payload: &str) -> Payload {
    if payload == DONE_SENTINEL {
        return Payload::Sentinel;
    }

    match serde_json::from_str::<ChunkPayload>(payload) {
        Ok(chunk) => match chunk.text() {
            Some(text) if text.is_empty() => Payload::Empty,
            Some(text) => Payload::Structured(text),
            None => raw(payload),
        },
        Err(_) => raw(payload),
    }
}

fn raw(payload: &str) -> Payload {
    if payload.is_empty() {
        Payload::Empty
    } else {
        Payload::Raw(payload.to_string())
    }
}
