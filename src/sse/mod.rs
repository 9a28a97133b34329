//! SSE (Server-Sent Events) response decoding
//!
//! Turns a chat backend's event-stream body into assistant text.
//! Wire format:
//! - `data: <payload>` - an event carrying a payload
//! - Empty line - ends the event
//! - `data: [DONE]` - no more events will follow
//! - Anything else - ignored
//!
//! A payload is either a JSON chunk, from which `choices[0].delta.content`
//! (or `choices[0].text`) is taken, or plain text, which is passed through.
//!
//! # Module structure
//! - `events` - Output types (StreamItem, Payload, DecoderState) and wire constants
//! - `payloads` - JSON chunk deserialization structs
//! - `parser` - Synchronous decoder (EventDecoder, resolve_payload)
//! - `stream` - Async driver with cancellation, plus callback adapters

mod events;
mod parser;
mod payloads;
mod stream;

pub use events::{DecoderState, Payload, StreamItem, DATA_PREFIX, DONE_SENTINEL};
pub use parser::{resolve_payload, EventDecoder};
pub use stream::{
    collect_text, decode_stream, relay, single_fragment, FragmentSink, FragmentStream, WriteSink,
};
