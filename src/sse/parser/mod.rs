//! Incremental event decoding.
//!
//! [`EventDecoder`] is the synchronous core: bytes in, [`StreamItem`]s out.
//! It never waits on anything, which keeps the chunk-splitting behaviour
//! testable without a runtime. The async driver lives in `sse::stream`.

mod payload;

pub use payload::resolve_payload;

use tracing::trace;

use crate::sse::events::{DecoderState, StreamItem, DATA_PREFIX};

const EVENT_DELIMITER: &str = "\n\n";

/// Stateful decoder for a `data:`-line event stream.
///
/// Buffers text until a blank line closes an event, then resolves every
/// complete event in arrival order. Once the sentinel has been seen, or
/// [`finish`](Self::finish) has run, the decoder is done and ignores all
/// further input.
#[derive(Debug, Default)]
pub struct EventDecoder {
    /// Decoded text not yet resolved into a complete event
    buffer: String,
    /// Leading bytes of a UTF-8 sequence split across chunks
    pending_utf8: Vec<u8>,
    /// A trailing '\r' held back until the next chunk shows whether a '\n'
    /// follows it
    pending_cr: bool,
    state: DecoderState,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == DecoderState::Done
    }

    /// Feed one chunk of the response body.
    ///
    /// Returns the items for every event completed by this chunk. A
    /// [`StreamItem::Done`] is always the last item returned.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamItem> {
        if self.is_done() {
            return Vec::new();
        }
        self.push_bytes(chunk);
        self.drain_events()
    }

    /// Signal that the body has ended.
    ///
    /// Resolves whatever is still buffered (including an unterminated final
    /// event) and returns [`StreamItem::Done`] unless the sentinel already
    /// produced it.
    pub fn finish(&mut self) -> Vec<StreamItem> {
        if self.is_done() {
            return Vec::new();
        }

        if !self.pending_utf8.is_empty() {
            let tail = std::mem::take(&mut self.pending_utf8);
            self.push_text(&String::from_utf8_lossy(&tail));
        }
        if std::mem::take(&mut self.pending_cr) {
            self.buffer.push('\r');
        }

        let mut items = self.drain_events();
        if !self.is_done() {
            let tail = std::mem::take(&mut self.buffer);
            if !tail.trim().is_empty() {
                trace!("resolving unterminated final event");
                self.resolve_event(&tail, &mut items);
            }
        }
        if !self.is_done() {
            self.state = DecoderState::Done;
            items.push(StreamItem::Done);
        }
        self.buffer.clear();
        items
    }

    /// Append bytes to the text buffer, holding back an incomplete trailing
    /// UTF-8 sequence. Invalid sequences become U+FFFD.
    fn push_bytes(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.pending_utf8);
        bytes.extend_from_slice(chunk);

        let mut text = String::with_capacity(bytes.len());
        let mut input = bytes.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        None => {
                            self.pending_utf8 = rest.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        self.push_text(&text);
    }

    /// Append newly decoded text with CRLF folded to LF.
    ///
    /// Only the new text is folded, so text already buffered is never
    /// rescanned. The one pair that can straddle two chunks is a held
    /// trailing '\r' followed by a leading '\n'.
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if std::mem::take(&mut self.pending_cr) && !text.starts_with('\n') {
            self.buffer.push('\r');
        }
        let body = match text.strip_suffix('\r') {
            Some(body) => {
                self.pending_cr = true;
                body
            }
            None => text,
        };
        if body.contains("\r\n") {
            self.buffer.push_str(&body.replace("\r\n", "\n"));
        } else {
            self.buffer.push_str(body);
        }
    }

    fn drain_events(&mut self) -> Vec<StreamItem> {
        let mut items = Vec::new();
        while !self.is_done() {
            let Some(boundary) = self.buffer.find(EVENT_DELIMITER) else {
                break;
            };
            let event: String = self.buffer.drain(..boundary + EVENT_DELIMITER.len()).collect();
            self.resolve_event(&event[..boundary], &mut items);
        }
        if self.is_done() {
            self.buffer.clear();
            self.pending_utf8.clear();
            self.pending_cr = false;
        }
        items
    }

    fn resolve_event(&mut self, event: &str, items: &mut Vec<StreamItem>) {
        let event = event.trim();
        let Some(payload) = event.strip_prefix(DATA_PREFIX) else {
            if !event.is_empty() {
                trace!(event, "ignoring event without data prefix");
            }
            return;
        };

        match resolve_payload(payload.trim_start()).into_item() {
            Some(StreamItem::Done) => {
                self.state = DecoderState::Done;
                items.push(StreamItem::Done);
            }
            Some(item) => items.push(item),
            None => {}
        }
    }
}
