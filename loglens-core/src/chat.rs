//! Conversation model: messages and the append-only log

use serde::Serialize;
use serde_json::Value;

use crate::insight::normalize_list_field;

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One turn in the conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// Full structured answer, only on assistant turns
    #[serde(rename = "full", skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ChatMessage {
    /// A question typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            detail: None,
        }
    }

    /// An answer from the query service.
    ///
    /// The display text is the response's `summary`; the whole response is
    /// kept as the detail payload.
    pub fn from_answer(response: Value) -> Self {
        let text = response
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            sender: Sender::Assistant,
            text,
            detail: Some(response),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Findings carried in the detail payload, normalized to a list.
    pub fn detail_findings(&self) -> Vec<String> {
        self.detail_list("findings")
    }

    /// Recommendations carried in the detail payload, normalized to a list.
    pub fn detail_recommendations(&self) -> Vec<String> {
        self.detail_list("recommendations")
    }

    fn detail_list(&self, key: &str) -> Vec<String> {
        normalize_list_field(self.detail.as_ref().and_then(|d| d.get(key)))
    }
}

/// Ordered, append-only conversation log.
///
/// Insertion order is display order. There is no way to remove or edit a
/// message once pushed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_uses_summary_and_keeps_detail() {
        let response = json!({
            "summary": "Disk filled up at 03:12",
            "findings": "disk full",
            "recommendations": ["add alerting", "rotate logs"],
            "sources": [1, 2]
        });
        let msg = ChatMessage::from_answer(response.clone());

        assert_eq!(msg.sender, Sender::Assistant);
        assert_eq!(msg.text, "Disk filled up at 03:12");
        assert_eq!(msg.detail, Some(response));
        assert_eq!(msg.detail_findings(), vec!["disk full"]);
        assert_eq!(
            msg.detail_recommendations(),
            vec!["add alerting", "rotate logs"]
        );
    }

    #[test]
    fn test_answer_without_summary() {
        let msg = ChatMessage::from_answer(json!({"answer": 1}));
        assert_eq!(msg.text, "");
        assert!(msg.detail_findings().is_empty());
    }

    #[test]
    fn test_wire_form() {
        let user = serde_json::to_value(ChatMessage::user("why?")).unwrap();
        assert_eq!(user, json!({"sender": "user", "text": "why?"}));

        let bot = serde_json::to_value(ChatMessage::from_answer(json!({"summary": "s"}))).unwrap();
        assert_eq!(bot["sender"], json!("assistant"));
        assert_eq!(bot["full"], json!({"summary": "s"}));
    }

    #[test]
    fn test_conversation_keeps_insertion_order() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::user("first"));
        conversation.push(ChatMessage::user("second"));

        let texts: Vec<_> = conversation.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(serde_json::to_value(&conversation).unwrap().as_array().unwrap().len(), 2);
    }
}
