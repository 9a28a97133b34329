//! Structured payload deserialization.
//!
//! Only the fields on the text-extraction path are modelled; everything else
//! in an event body is ignored.

use serde::Deserialize;

/// OpenAI-style streaming chunk: `{"choices":[{"delta":{"content":"..."}}]}`
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ChunkPayload {
    #[serde(default)]
    pub choices: Vec<ChoicePayload>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ChoicePayload {
    #[serde(default)]
    pub delta: Option<DeltaPayload>,
    /// Completion-style chunks carry the text directly on the choice
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct DeltaPayload {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChunkPayload {
    /// `choices[0].delta.content`, else `choices[0].text`.
    pub fn text(self) -> Option<String> {
        let first = self.choices.into_iter().next()?;
        first.delta.and_then(|d| d.content).or(first.text)
    }
}
