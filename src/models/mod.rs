//! Wire and domain types shared by the chat and image clients.

mod image;
mod message;
mod request;

pub use image::{ImageData, ImageModel, ImageResponse, ImageSize};
pub use message::{serialize_history, ChatMessage, MessageRole};
pub use request::{FlowRequest, ImageRequest};
