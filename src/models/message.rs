use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Speaker label used when the history is flattened into one prompt.
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }
}

/// One turn of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Flatten a conversation into the single text payload the chat flow takes.
///
/// Each turn becomes `User: <content>` or `Assistant: <content>`, one per
/// line, in order.
pub fn serialize_history(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_history() {
        let history = vec![
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello! How can I help?"),
            ChatMessage::user("Tell me a joke"),
        ];
        assert_eq!(
            serialize_history(&history),
            "User: Hi\nAssistant: Hello! How can I help?\nUser: Tell me a joke"
        );
    }

    #[test]
    fn test_serialize_empty_history() {
        assert_eq!(serialize_history(&[]), "");
    }

    #[test]
    fn test_multiline_content_is_kept() {
        let history = vec![ChatMessage::user("line one\nline two")];
        assert_eq!(serialize_history(&history), "User: line one\nline two");
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&ChatMessage::assistant("x")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"x"}"#);
        let back: ChatMessage = serde_json::from_str(r#"{"role":"user","content":"y"}"#).unwrap();
        assert_eq!(back, ChatMessage::user("y"));
    }
}
