//! Types produced by the event decoder.

/// Prefix that marks an event carrying a payload.
pub const DATA_PREFIX: &str = "data:";

/// Payload value that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One element of a fragment stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamItem {
    /// A non-empty piece of assistant text
    Fragment(String),
    /// No more fragments will follow
    Done,
}

impl StreamItem {
    pub fn fragment(text: impl Into<String>) -> Self {
        StreamItem::Fragment(text.into())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StreamItem::Done)
    }

    /// The fragment text, if this is a fragment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StreamItem::Fragment(text) => Some(text),
            StreamItem::Done => None,
        }
    }
}

/// How a single event payload resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The terminal sentinel
    Sentinel,
    /// Text found on the structured extraction path
    Structured(String),
    /// The payload itself, because it was not structured or had no text field
    Raw(String),
    /// Nothing to emit
    Empty,
}

impl Payload {
    /// The fragment this payload contributes, if any.
    pub fn into_item(self) -> Option<StreamItem> {
        match self {
            Payload::Sentinel => Some(StreamItem::Done),
            Payload::Structured(text) | Payload::Raw(text) => Some(StreamItem::Fragment(text)),
            Payload::Empty => None,
        }
    }
}

/// Decoder lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    #[default]
    Streaming,
    Done,
}
