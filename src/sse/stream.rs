//! Async driver: turns a live response body into a fragment stream.

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::pin::Pin;
use tracing::{debug, warn};

use crate::cancel::{CancelHandle, CancelSignal};
use crate::error::ChatError;
use crate::sse::events::StreamItem;
use crate::sse::parser::EventDecoder;
use crate::traits::{ByteStream, HttpError};

/// A cancellable, pull-based sequence of fragments.
///
/// Yields zero or more `Ok(StreamItem::Fragment)` followed by exactly one
/// `Ok(StreamItem::Done)`, or ends early with a single `Err`.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<StreamItem, ChatError>> + Send>>;

struct DriverState {
    bytes: ByteStream,
    decoder: EventDecoder,
    ready: VecDeque<StreamItem>,
    cancel: CancelSignal,
    finished: bool,
}

enum Wake {
    Cancelled,
    Chunk(Option<Result<Bytes, HttpError>>),
}

/// Decode `bytes` into fragments, stopping early if `cancel` fires.
///
/// Cancellation is checked before every item is handed out and raced
/// against every wait for the next chunk. Once observed, the stream yields
/// [`ChatError::Cancelled`] and ends.
pub fn decode_stream(bytes: ByteStream, cancel: CancelSignal) -> FragmentStream {
    let state = DriverState {
        bytes,
        decoder: EventDecoder::new(),
        ready: VecDeque::new(),
        cancel,
        finished: false,
    };

    let stream = stream::unfold(state, |mut st| async move {
        loop {
            if st.finished {
                return None;
            }

            if st.cancel.is_cancelled() {
                debug!("event stream cancelled");
                st.finished = true;
                return Some((Err(ChatError::Cancelled), st));
            }

            if let Some(item) = st.ready.pop_front() {
                if item.is_done() {
                    st.finished = true;
                }
                return Some((Ok(item), st));
            }

            let wake = tokio::select! {
                biased;
                _ = st.cancel.cancelled() => Wake::Cancelled,
                chunk = st.bytes.next() => Wake::Chunk(chunk),
            };

            match wake {
                // Reported on the next pass, before anything else is yielded
                Wake::Cancelled => continue,
                Wake::Chunk(Some(Ok(chunk))) => {
                    let items = st.decoder.feed(&chunk);
                    st.ready.extend(items);
                }
                Wake::Chunk(Some(Err(err))) => {
                    warn!(error = %err, "event stream broke off");
                    st.finished = true;
                    return Some((Err(ChatError::from(err)), st));
                }
                Wake::Chunk(None) => {
                    debug!("event stream ended");
                    let items = st.decoder.finish();
                    st.ready.extend(items);
                }
            }
        }
    });

    Box::pin(stream)
}

/// A finished stream holding one optional fragment.
pub fn single_fragment(text: Option<String>) -> FragmentStream {
    let items: Vec<Result<StreamItem, ChatError>> = text
        .filter(|t| !t.is_empty())
        .map(|t| Ok(StreamItem::Fragment(t)))
        .into_iter()
        .chain(std::iter::once(Ok(StreamItem::Done)))
        .collect();
    Box::pin(stream::iter(items))
}

/// Callback-style consumer of a fragment stream.
pub trait FragmentSink {
    fn on_fragment(&mut self, text: &str);
    fn on_complete(&mut self);
}

/// Any `(on_fragment, on_complete)` closure pair is a sink.
impl<F, G> FragmentSink for (F, G)
where
    F: FnMut(&str),
    G: FnMut(),
{
    fn on_fragment(&mut self, text: &str) {
        (self.0)(text)
    }

    fn on_complete(&mut self) {
        (self.1)()
    }
}

/// Sink that echoes fragments to a writer as they arrive and keeps the
/// full text.
///
/// The first failed write or flush is recorded and fires `cancel`, so a
/// stream driven by the matching signal stops at its next item instead of
/// running on with nowhere to print.
pub struct WriteSink<W: Write> {
    writer: W,
    text: String,
    cancel: CancelHandle,
    error: Option<io::Error>,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W, cancel: CancelHandle) -> Self {
        Self {
            writer,
            text: String::new(),
            cancel,
            error: None,
        }
    }

    /// Text written so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// The written text and the write error that stopped output, if any.
    pub fn into_parts(self) -> (String, Option<io::Error>) {
        (self.text, self.error)
    }

    fn emit(&mut self, bytes: &[u8]) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.writer.write_all(bytes).and_then(|_| self.writer.flush()) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "output write failed, stopping stream");
                self.error = Some(err);
                self.cancel.cancel();
                false
            }
        }
    }
}

impl<W: Write> FragmentSink for WriteSink<W> {
    fn on_fragment(&mut self, text: &str) {
        if self.emit(text.as_bytes()) {
            self.text.push_str(text);
        }
    }

    fn on_complete(&mut self) {
        self.emit(b"\n");
    }
}

/// Drive `stream` to the end, delivering each item to `sink`.
///
/// `on_complete` runs exactly once on success. On error neither callback
/// runs again and the error is returned.
pub async fn relay<S: FragmentSink + ?Sized>(
    mut stream: FragmentStream,
    sink: &mut S,
) -> Result<(), ChatError> {
    while let Some(item) = stream.next().await {
        match item? {
            StreamItem::Fragment(text) => sink.on_fragment(&text),
            StreamItem::Done => {
                sink.on_complete();
                return Ok(());
            }
        }
    }
    // Every stream built here ends with Done or an error
    sink.on_complete();
    Ok(())
}

/// Concatenate every fragment of `stream`.
pub async fn collect_text(stream: FragmentStream) -> Result<String, ChatError> {
    let mut text = String::new();
    let mut sink = (|fragment: &str| text.push_str(fragment), || {});
    relay(stream, &mut sink).await?;
    Ok(text)
}
