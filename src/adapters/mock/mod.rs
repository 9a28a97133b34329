//! Test doubles for the transport trait.
//!
//! - [`MockHttpClient`] - scripted responses and chunk streams

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
