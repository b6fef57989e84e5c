//! Backend API seam.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use widget_core::{BotDetails, Message, MessageFeedback, SessionInfo, TriggerKind};

use crate::error::Result;
use crate::models::AnswerEvent;

/// Server-push channel for one question. Items are token events followed
/// by exactly one completion event on success; error items carry
/// malformed-payload or transport failures. Dropping the stream closes
/// the channel.
pub type AnswerStream = Pin<Box<dyn Stream<Item = Result<AnswerEvent>> + Send>>;

/// Operations the widget performs against the backend.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// POST /session/create → new session guid.
    async fn create_session(&self, bot_guid: &str, user_guid: &str) -> Result<String>;

    /// DELETE /session/end/{session_guid}.
    async fn end_session(&self, session_guid: &str, user_guid: &str) -> Result<()>;

    /// GET /session/status/{session_guid}.
    async fn session_status(&self, session_guid: &str, user_guid: &str) -> Result<SessionInfo>;

    /// GET /session/list_messages/{session_guid} → ordered history.
    async fn list_messages(&self, session_guid: &str, user_guid: &str) -> Result<Vec<Message>>;

    /// POST /session/trigger_bot_message/{session_guid} → the created message.
    async fn trigger_bot_message(
        &self,
        session_guid: &str,
        user_guid: &str,
        kind: TriggerKind,
    ) -> Result<Message>;

    /// POST /session/feedback/{session_guid}/message/{message_guid}.
    async fn message_feedback(
        &self,
        session_guid: &str,
        message_guid: &str,
        user_guid: &str,
        feedback: Option<MessageFeedback>,
    ) -> Result<()>;

    /// POST /session/feedback/{session_guid}; rating 1..=5 or null.
    async fn session_feedback(
        &self,
        session_guid: &str,
        user_guid: &str,
        rating: Option<u8>,
    ) -> Result<()>;

    /// GET /bot/details/{bot_guid}.
    async fn bot_details(&self, bot_guid: &str) -> Result<BotDetails>;

    /// Open the answer channel for one question.
    async fn answer_question(
        &self,
        session_guid: &str,
        user_guid: &str,
        question: &str,
    ) -> Result<AnswerStream>;
}
