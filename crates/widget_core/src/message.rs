//! Message data model
//!
//! A message is one entry of the session transcript. Messages created
//! client-side before the backend acknowledges them carry
//! `provisional = true` and a locally generated guid; the guid is swapped
//! for the server-issued one exactly once, on stream completion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::guid::generate_guid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Bot,
}

/// Per-message feedback given by the visitor on a bot answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFeedback {
    Positive,
    Negative,
    None,
}

/// Templated bot messages that the backend renders on demand rather than
/// the bot typing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    FeedbackRequestedMessage,
    GoodbyeMessage,
}

impl TriggerKind {
    /// Wire name used by the trigger endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeedbackRequestedMessage => "feedback_requested_message",
            Self::GoodbyeMessage => "goodbye_message",
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub guid: String,
    pub role: MessageRole,
    /// Message payload kind; only "text" today.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub content: String,
    #[serde(default)]
    pub feedback: Option<MessageFeedback>,
    pub created_at: DateTime<Utc>,
    /// Set when this message came from a templated trigger flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfg_type: Option<TriggerKind>,
    /// True until the backend has acknowledged the message with a
    /// permanent guid. Client-local; never serialized to the wire.
    #[serde(default, skip_serializing)]
    pub provisional: bool,
}

fn default_kind() -> String {
    "text".to_string()
}

impl Message {
    /// A provisional user message, as appended right before a question is
    /// submitted for streaming.
    pub fn provisional_user(content: impl Into<String>) -> Self {
        Self {
            guid: generate_guid(),
            role: MessageRole::User,
            kind: default_kind(),
            content: content.into(),
            feedback: None,
            created_at: Utc::now(),
            cfg_type: None,
            provisional: true,
        }
    }

    /// A provisional bot message, created when the first token of a
    /// streamed answer arrives.
    pub fn provisional_bot(content: impl Into<String>) -> Self {
        Self {
            guid: generate_guid(),
            role: MessageRole::Bot,
            kind: default_kind(),
            content: content.into(),
            feedback: None,
            created_at: Utc::now(),
            cfg_type: None,
            provisional: false,
        }
        .into_provisional()
    }

    /// A locally-authored fallback for a failed trigger call. Carries the
    /// same `cfg_type` tag the server-rendered message would have.
    pub fn local_trigger_fallback(kind: TriggerKind, content: impl Into<String>) -> Self {
        Self {
            guid: generate_guid(),
            role: MessageRole::Bot,
            kind: default_kind(),
            content: content.into(),
            feedback: None,
            created_at: Utc::now(),
            cfg_type: Some(kind),
            provisional: false,
        }
    }

    fn into_provisional(mut self) -> Self {
        self.provisional = true;
        self
    }

    /// A finalized plain bot message qualifies for inactivity tracking;
    /// trigger messages and in-flight provisional ones do not.
    pub fn is_plain_bot_message(&self) -> bool {
        self.role == MessageRole::Bot && self.cfg_type.is_none() && !self.provisional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_constructors_mark_messages() {
        let user = Message::provisional_user("hello");
        assert!(user.provisional);
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.guid.len(), 32);

        let bot = Message::provisional_bot("hi");
        assert!(bot.provisional);
        assert_eq!(bot.role, MessageRole::Bot);
    }

    #[test]
    fn plain_bot_message_detection() {
        let mut msg = Message::provisional_bot("hi");
        assert!(!msg.is_plain_bot_message());

        msg.provisional = false;
        assert!(msg.is_plain_bot_message());

        let trigger =
            Message::local_trigger_fallback(TriggerKind::GoodbyeMessage, "bye");
        assert!(!trigger.is_plain_bot_message());

        let user = Message::provisional_user("q");
        assert!(!user.is_plain_bot_message());
    }

    #[test]
    fn provisional_flag_is_not_serialized() {
        let msg = Message::provisional_user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("provisional").is_none());
        assert_eq!(json["type"], "text");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn deserializes_server_message() {
        let json = r#"{
            "guid": "a1b2",
            "role": "bot",
            "type": "text",
            "content": "Please provide your feedback.",
            "cfg_type": "feedback_requested_message",
            "feedback": null,
            "created_at": "2024-05-01T12:00:00Z"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.cfg_type, Some(TriggerKind::FeedbackRequestedMessage));
        assert!(!msg.provisional);
    }
}
