use serde::Serialize;

/// Body of a chat-flow run request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlowRequest {
    /// The serialized conversation
    pub input_value: String,
    pub input_type: &'static str,
    pub output_type: &'static str,
    /// Ask for an event stream instead of one JSON document
    pub stream: bool,
}

impl FlowRequest {
    pub fn new(input_value: String, stream: bool) -> Self {
        Self {
            input_value,
            input_type: "chat",
            output_type: "chat",
            stream,
        }
    }
}

/// Body of an image generation request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageRequest {
    pub model: super::ImageModel,
    pub prompt: String,
    pub n: u32,
    pub size: super::ImageSize,
    /// Image endpoints do not stream
    pub stream: bool,
}
