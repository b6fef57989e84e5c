//! Streaming answer controller
//!
//! Drives one question/answer exchange: appends a provisional user
//! message, consumes the token stream, materialises the provisional bot
//! message on the first token, and swaps both provisional guids for the
//! server's on completion. At most one exchange runs at a time.

use std::sync::Arc;

use futures_util::StreamExt;
use session_client::{AnswerEvent, ClientError, SessionApi};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use widget_core::{Message, WidgetConfig};
use widget_state::{EndButtonMode, ExchangeEvent, ExchangeMachine, SessionStore};

use crate::collaborators::{ErrorContext, ErrorReporter};
use crate::inactivity::InactivityTimerEngine;

/// How a `submit_question` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Not started: empty input or another exchange in flight.
    Rejected,
    /// Stream delivered its completion event, guids reconciled.
    Completed,
    /// Stream broke or produced an unreadable event; state rolled back.
    Failed,
    /// Cancelled locally before completion; state rolled back silently.
    Aborted,
}

pub struct StreamingAnswerController {
    store: Arc<SessionStore>,
    client: Arc<dyn SessionApi>,
    engine: Arc<InactivityTimerEngine>,
    reporter: Arc<dyn ErrorReporter>,
    config: WidgetConfig,
    cancel: Mutex<Option<CancellationToken>>,
}

impl StreamingAnswerController {
    pub fn new(
        store: Arc<SessionStore>,
        client: Arc<dyn SessionApi>,
        engine: Arc<InactivityTimerEngine>,
        reporter: Arc<dyn ErrorReporter>,
        config: WidgetConfig,
    ) -> Self {
        Self {
            store,
            client,
            engine,
            reporter,
            config,
            cancel: Mutex::new(None),
        }
    }

    /// Submit a question and run the exchange to its end.
    ///
    /// Rejects empty input and concurrent submissions. On success both
    /// provisional messages carry server guids, inactivity tracking is
    /// switched on, and the timers are re-evaluated. On failure the
    /// provisional user message is removed unless bot tokens already
    /// arrived; a partial bot answer stays on screen.
    pub async fn submit_question(&self, question: &str) -> SubmitOutcome {
        let question = question.trim();
        if question.is_empty() {
            return SubmitOutcome::Rejected;
        }
        // A session that ended or was found inactive accepts no questions.
        if self.store.end_button().await == EndButtonMode::ResetChat {
            return SubmitOutcome::Rejected;
        }
        if !self.store.try_begin_streaming().await {
            debug!("submission rejected, another exchange is in flight");
            return SubmitOutcome::Rejected;
        }
        self.store.clear_error_message().await;

        let user_message = Message::provisional_user(question);
        let tmp_user_guid = user_message.guid.clone();
        self.store.append_message(user_message).await;

        let token = CancellationToken::new();
        *self.cancel.lock().await = Some(token.clone());

        let outcome = self
            .run_exchange(question, &tmp_user_guid, &token)
            .await;

        *self.cancel.lock().await = None;
        if outcome == SubmitOutcome::Completed {
            self.engine.on_messages_changed().await;
        }
        outcome
    }

    /// Cancel the in-flight exchange, if any. The running submission
    /// rolls its provisional messages back and returns `Aborted`.
    pub async fn cancel(&self) {
        if let Some(token) = self.cancel.lock().await.take() {
            token.cancel();
        }
    }

    async fn run_exchange(
        &self,
        question: &str,
        tmp_user_guid: &str,
        cancel: &CancellationToken,
    ) -> SubmitOutcome {
        let session_guid = self.store.session_guid().await;
        let user_guid = self.store.user_guid().await;
        let mut machine = ExchangeMachine::new();

        let mut stream = match self
            .client
            .answer_question(&session_guid, &user_guid, question)
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                machine.handle_event(ExchangeEvent::TransportError);
                self.fail(question, tmp_user_guid, None, &err).await;
                return SubmitOutcome::Failed;
            }
        };

        let mut bot_guid: Option<String> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    machine.handle_event(ExchangeEvent::Cancelled);
                    if let Some(guid) = &bot_guid {
                        self.store.remove_message_by_guid(guid).await;
                    }
                    self.store.remove_message_by_guid(tmp_user_guid).await;
                    self.store.end_streaming().await;
                    return SubmitOutcome::Aborted;
                }
                event = stream.next() => match event {
                    Some(Ok(AnswerEvent::Token { token })) => {
                        machine.handle_event(ExchangeEvent::TokenReceived);
                        match &bot_guid {
                            Some(guid) => self.store.append_token(guid, &token).await,
                            None => {
                                let bot_message = Message::provisional_bot(token);
                                bot_guid = Some(bot_message.guid.clone());
                                self.store.append_message(bot_message).await;
                            }
                        }
                    }
                    Some(Ok(AnswerEvent::Completion {
                        bot_message_guid,
                        user_message_guid,
                    })) => {
                        machine.handle_event(ExchangeEvent::CompletionReceived);
                        self.store
                            .update_message_guid(tmp_user_guid, &user_message_guid)
                            .await;
                        self.store.clear_provisional(&user_message_guid).await;
                        if let Some(guid) = &bot_guid {
                            self.store
                                .update_message_guid(guid, &bot_message_guid)
                                .await;
                            self.store.clear_provisional(&bot_message_guid).await;
                        }
                        self.store.end_streaming().await;
                        self.store.set_track_inactivity(true).await;
                        return SubmitOutcome::Completed;
                    }
                    Some(Err(err)) => {
                        let event = match &err {
                            ClientError::MalformedEvent(_) => ExchangeEvent::MalformedEvent,
                            _ => ExchangeEvent::TransportError,
                        };
                        machine.handle_event(event);
                        self.fail(question, tmp_user_guid, bot_guid.as_deref(), &err)
                            .await;
                        return SubmitOutcome::Failed;
                    }
                    // Stream closed without a completion event.
                    None => {
                        machine.handle_event(ExchangeEvent::TransportError);
                        let err = ClientError::Stream(
                            "answer stream ended without completion".to_string(),
                        );
                        self.fail(question, tmp_user_guid, bot_guid.as_deref(), &err)
                            .await;
                        return SubmitOutcome::Failed;
                    }
                }
            }
        }
    }

    /// Failure cleanup. The provisional user message only survives when
    /// part of an answer already arrived, so the transcript never shows
    /// a question the bot never acknowledged.
    async fn fail(
        &self,
        question: &str,
        tmp_user_guid: &str,
        bot_guid: Option<&str>,
        err: &ClientError,
    ) {
        warn!("answer exchange failed: {}", err);
        self.store.end_streaming().await;
        if bot_guid.is_none() {
            self.store.remove_message_by_guid(tmp_user_guid).await;
        }
        self.store
            .set_error_message(&self.config.error_on_send)
            .await;
        let session_guid = self.store.session_guid().await;
        let user_guid = self.store.user_guid().await;
        self.reporter.record(
            &err.to_string(),
            ErrorContext::new(session_guid, user_guid).with_detail(question),
        );
    }
}
