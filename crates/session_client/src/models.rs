//! Wire payloads for the session backend.

use serde::{Deserialize, Serialize};
use widget_core::{Message, MessageFeedback};

#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub user_guid: &'a str,
    pub bot_guid: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionResponse {
    pub guid: String,
}

#[derive(Debug, Serialize)]
pub struct UserGuidBody<'a> {
    pub user_guid: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TriggerBotMessageRequest<'a> {
    pub user_guid: &'a str,
    pub message_type: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MessageFeedbackRequest<'a> {
    pub user_guid: &'a str,
    pub feedback: Option<MessageFeedback>,
}

#[derive(Debug, Serialize)]
pub struct SessionFeedbackRequest<'a> {
    pub user_guid: &'a str,
    pub feedback: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
}

/// One event of the answer channel.
///
/// The completion variant is listed first: an untagged deserialize tries
/// variants in order, and a token payload lacks the guid fields so it
/// falls through to `Token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnswerEvent {
    Completion {
        bot_message_guid: String,
        user_message_guid: String,
    },
    Token {
        token: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_event_deserializes() {
        let event: AnswerEvent = serde_json::from_str(r#"{"token": "Hi"}"#).unwrap();
        assert_eq!(
            event,
            AnswerEvent::Token {
                token: "Hi".to_string()
            }
        );
    }

    #[test]
    fn completion_event_deserializes() {
        let event: AnswerEvent = serde_json::from_str(
            r#"{"bot_message_guid": "b1", "user_message_guid": "u1"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            AnswerEvent::Completion {
                bot_message_guid: "b1".to_string(),
                user_message_guid: "u1".to_string(),
            }
        );
    }

    #[test]
    fn unrecognized_payload_is_rejected() {
        assert!(serde_json::from_str::<AnswerEvent>(r#"{"status": "busy"}"#).is_err());
        assert!(serde_json::from_str::<AnswerEvent>("not json").is_err());
    }
}
