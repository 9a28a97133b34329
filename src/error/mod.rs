//! Error handling for promptline.
//!
//! | Variant | Meaning | Aborts the request |
//! |---------|---------|--------------------|
//! | `Transport` | network failure or broken body | yes |
//! | `Status` | non-success HTTP status | yes |
//! | `StreamUnsupported` | no streamable body | yes |
//! | `Cancelled` | caller fired the cancel handle | yes |
//! | `InvalidResponse` | required JSON could not be decoded | yes |
//! | `Config` | missing or malformed configuration | yes |
//!
//! Malformed event payloads are not errors; see [`crate::sse`].

mod chat_error;

pub use chat_error::ChatError;

/// Result alias used throughout the crate.
pub type ChatResult<T> = Result<T, ChatError>;
