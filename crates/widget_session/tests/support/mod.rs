//! Scripted in-memory backend used across the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use session_client::{AnswerEvent, AnswerStream, ClientError, Result, SessionApi};
use widget_core::{
    BotConfiguration, BotDetails, Message, MessageFeedback, SessionInfo, SessionStatus,
    TriggerKind,
};

/// What the next `answer_question` call should produce.
pub enum AnswerScript {
    /// A finite stream of scripted events.
    Events(Vec<Result<AnswerEvent>>),
    /// A stream that never yields, for cancellation tests.
    Pending,
    /// The request itself fails before any stream opens.
    Fail,
}

pub struct StubApi {
    pub create_calls: Mutex<u32>,
    pub end_calls: Mutex<Vec<String>>,
    pub trigger_calls: Mutex<Vec<TriggerKind>>,
    pub message_feedback_calls: Mutex<Vec<(String, Option<MessageFeedback>)>>,
    pub session_feedback_calls: Mutex<Vec<Option<u8>>>,
    pub answer_calls: Mutex<u32>,

    fail_end: Mutex<bool>,
    failing_triggers: Mutex<Vec<TriggerKind>>,
    status: Mutex<SessionInfo>,
    bot: Mutex<BotDetails>,
    history: Mutex<Vec<Message>>,
    answers: Mutex<VecDeque<AnswerScript>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            create_calls: Mutex::new(0),
            end_calls: Mutex::new(Vec::new()),
            trigger_calls: Mutex::new(Vec::new()),
            message_feedback_calls: Mutex::new(Vec::new()),
            session_feedback_calls: Mutex::new(Vec::new()),
            answer_calls: Mutex::new(0),
            fail_end: Mutex::new(false),
            failing_triggers: Mutex::new(Vec::new()),
            status: Mutex::new(SessionInfo {
                status: SessionStatus::Active,
                feedback: None,
            }),
            bot: Mutex::new(BotDetails {
                guid: Some("bot-guid".to_string()),
                status: "success".to_string(),
                configuration: BotConfiguration::default(),
            }),
            history: Mutex::new(Vec::new()),
            answers: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push_answer(&self, events: Vec<Result<AnswerEvent>>) {
        self.answers.lock().unwrap().push_back(AnswerScript::Events(events));
    }

    pub fn push_pending_answer(&self) {
        self.answers.lock().unwrap().push_back(AnswerScript::Pending);
    }

    pub fn push_failing_answer(&self) {
        self.answers.lock().unwrap().push_back(AnswerScript::Fail);
    }

    pub fn set_status(&self, info: SessionInfo) {
        *self.status.lock().unwrap() = info;
    }

    pub fn set_bot(&self, bot: BotDetails) {
        *self.bot.lock().unwrap() = bot;
    }

    pub fn set_history(&self, messages: Vec<Message>) {
        *self.history.lock().unwrap() = messages;
    }

    pub fn set_fail_end(&self, fail: bool) {
        *self.fail_end.lock().unwrap() = fail;
    }

    pub fn fail_trigger(&self, kind: TriggerKind) {
        self.failing_triggers.lock().unwrap().push(kind);
    }

    pub fn create_calls(&self) -> u32 {
        *self.create_calls.lock().unwrap()
    }

    pub fn end_calls(&self) -> Vec<String> {
        self.end_calls.lock().unwrap().clone()
    }

    pub fn trigger_calls(&self) -> Vec<TriggerKind> {
        self.trigger_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionApi for StubApi {
    async fn create_session(&self, _bot_guid: &str, _user_guid: &str) -> Result<String> {
        let mut calls = self.create_calls.lock().unwrap();
        *calls += 1;
        Ok(format!("srv-session-{}", *calls))
    }

    async fn end_session(&self, session_guid: &str, _user_guid: &str) -> Result<()> {
        if *self.fail_end.lock().unwrap() {
            return Err(ClientError::Api {
                status: 502,
                message: "Failed to end session.".to_string(),
            });
        }
        self.end_calls.lock().unwrap().push(session_guid.to_string());
        Ok(())
    }

    async fn session_status(&self, _session_guid: &str, _user_guid: &str) -> Result<SessionInfo> {
        Ok(self.status.lock().unwrap().clone())
    }

    async fn list_messages(&self, _session_guid: &str, _user_guid: &str) -> Result<Vec<Message>> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn trigger_bot_message(
        &self,
        _session_guid: &str,
        _user_guid: &str,
        kind: TriggerKind,
    ) -> Result<Message> {
        if self.failing_triggers.lock().unwrap().contains(&kind) {
            return Err(ClientError::Api {
                status: 500,
                message: format!("Failed to trigger {}.", kind.as_str()),
            });
        }
        self.trigger_calls.lock().unwrap().push(kind);
        let content = match kind {
            TriggerKind::FeedbackRequestedMessage => "Please provide your feedback.",
            TriggerKind::GoodbyeMessage => "Thank you for your time. Have a great day!",
        };
        Ok(Message::local_trigger_fallback(kind, content))
    }

    async fn message_feedback(
        &self,
        _session_guid: &str,
        message_guid: &str,
        _user_guid: &str,
        feedback: Option<MessageFeedback>,
    ) -> Result<()> {
        self.message_feedback_calls
            .lock()
            .unwrap()
            .push((message_guid.to_string(), feedback));
        Ok(())
    }

    async fn session_feedback(
        &self,
        _session_guid: &str,
        _user_guid: &str,
        rating: Option<u8>,
    ) -> Result<()> {
        self.session_feedback_calls.lock().unwrap().push(rating);
        Ok(())
    }

    async fn bot_details(&self, _bot_guid: &str) -> Result<BotDetails> {
        Ok(self.bot.lock().unwrap().clone())
    }

    async fn answer_question(
        &self,
        _session_guid: &str,
        _user_guid: &str,
        _question: &str,
    ) -> Result<AnswerStream> {
        *self.answer_calls.lock().unwrap() += 1;
        let script = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(AnswerScript::Fail);
        match script {
            AnswerScript::Events(events) => Ok(stream::iter(events).boxed()),
            AnswerScript::Pending => Ok(stream::pending().boxed()),
            AnswerScript::Fail => Err(ClientError::Api {
                status: 500,
                message: "Failed to send message.".to_string(),
            }),
        }
    }
}

/// A finalized plain bot message, as the history endpoint would return.
pub fn server_bot_message(guid: &str, content: &str) -> Message {
    let mut message = Message::provisional_bot(content);
    message.guid = guid.to_string();
    message.provisional = false;
    message
}

/// A finalized user message, as the history endpoint would return.
pub fn server_user_message(guid: &str, content: &str) -> Message {
    let mut message = Message::provisional_user(content);
    message.guid = guid.to_string();
    message.provisional = false;
    message
}

pub fn completion(bot_guid: &str, user_guid: &str) -> AnswerEvent {
    AnswerEvent::Completion {
        bot_message_guid: bot_guid.to_string(),
        user_message_guid: user_guid.to_string(),
    }
}

pub fn token(text: &str) -> AnswerEvent {
    AnswerEvent::Token {
        token: text.to_string(),
    }
}
