//! Mock transport fixtures.
//!
//! This module re-exports the mock implementations from
//! `promptline::adapters::mock` and provides a builder for common setups.

pub use promptline::adapters::mock::{MockHttpClient, MockResponse, RecordedRequest};
pub use promptline::traits::{Headers, HttpClient, HttpError, Response};

use bytes::Bytes;

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Configures a buffered response.
    pub fn with_json_response(self, url: &str, status: u16, json: &str) -> Self {
        self.client.set_response(
            url,
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Configures a streamed body delivered in the given chunks.
    pub fn with_stream_chunks(self, url: &str, chunks: Vec<Vec<u8>>) -> Self {
        self.client.set_response(
            url,
            MockResponse::Stream(chunks.into_iter().map(Bytes::from).collect()),
        );
        self
    }

    /// Configures a streamed body delivered one byte per chunk.
    pub fn with_bytewise_stream(self, url: &str, body: &str) -> Self {
        let chunks = body.bytes().map(|b| vec![b]).collect();
        self.with_stream_chunks(url, chunks)
    }

    /// Configures a body that breaks off after `chunks`.
    pub fn with_broken_stream(self, url: &str, chunks: Vec<&'static str>, error: HttpError) -> Self {
        self.client.set_response(
            url,
            MockResponse::StreamThenError(
                chunks.into_iter().map(Bytes::from).collect(),
                error,
            ),
        );
        self
    }

    /// Configures a transport error.
    pub fn with_error(self, url: &str, error: HttpError) -> Self {
        self.client.set_response(url, MockResponse::Error(error));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}
