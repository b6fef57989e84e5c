//! Widget facade
//!
//! Wires the store, lifecycle, inactivity engine and streaming
//! controller together behind one handle, the surface an embedder talks
//! to. Rendering and input capture stay on the host side; the facade
//! only exposes state and operations.

use std::sync::Arc;

use session_client::{ClientError, SessionApi};
use widget_core::{BotDetails, MessageFeedback, TriggerKind, WidgetConfig};
use widget_state::SessionStore;
use widget_storage::{IdentityGateway, KeyValueStorage};

use crate::collaborators::{ConfirmPrompt, ErrorReporter};
use crate::inactivity::InactivityTimerEngine;
use crate::lifecycle::SessionLifecycle;
use crate::streaming::{StreamingAnswerController, SubmitOutcome};

pub struct ChatWidget {
    store: Arc<SessionStore>,
    identity: IdentityGateway,
    client: Arc<dyn SessionApi>,
    lifecycle: Arc<SessionLifecycle>,
    engine: Arc<InactivityTimerEngine>,
    streaming: StreamingAnswerController,
    config: WidgetConfig,
}

impl ChatWidget {
    pub fn new(
        config: WidgetConfig,
        client: Arc<dyn SessionApi>,
        storage: Arc<dyn KeyValueStorage>,
        confirm: Arc<dyn ConfirmPrompt>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let store = Arc::new(SessionStore::new());
        let identity = IdentityGateway::new(storage);
        let lifecycle = Arc::new(SessionLifecycle::new(
            Arc::clone(&store),
            Arc::clone(&client),
            identity.clone(),
            config.clone(),
            confirm,
            Arc::clone(&reporter),
        ));
        let engine = Arc::new(InactivityTimerEngine::new(
            Arc::clone(&store),
            Arc::clone(&client),
            Arc::clone(&lifecycle),
            config.clone(),
            Arc::clone(&reporter),
        ));
        let streaming = StreamingAnswerController::new(
            Arc::clone(&store),
            Arc::clone(&client),
            Arc::clone(&engine),
            reporter,
            config.clone(),
        );
        Self {
            store,
            identity,
            client,
            lifecycle,
            engine,
            streaming,
            config,
        }
    }

    /// Bring the widget up: bot details, session, status, history.
    pub async fn connect(&self) -> Result<(), ClientError> {
        self.lifecycle.initialize().await
    }

    pub async fn submit_question(&self, question: &str) -> SubmitOutcome {
        self.streaming.submit_question(question).await
    }

    /// Cancel the in-flight answer exchange, if any.
    pub async fn cancel_exchange(&self) {
        self.streaming.cancel().await;
    }

    /// Any user interaction (typing, clicking) resets idle detection.
    pub async fn input_activity(&self) {
        self.engine.user_activity().await;
    }

    /// End the current session with the full wind-down: feedback prompt,
    /// goodbye, then the terminal backend call.
    pub async fn end_session(&self, show_confirm: bool) {
        self.lifecycle
            .end_session(
                show_confirm,
                &[
                    TriggerKind::FeedbackRequestedMessage,
                    TriggerKind::GoodbyeMessage,
                ],
            )
            .await;
    }

    /// Drop the ended session and start a fresh one.
    pub async fn reset(&self) -> Result<(), ClientError> {
        self.lifecycle.reset().await
    }

    /// Rate a single bot message. The store mirrors the rating only
    /// after the backend accepted it.
    pub async fn message_feedback(
        &self,
        message_guid: &str,
        feedback: Option<MessageFeedback>,
    ) -> Result<(), ClientError> {
        let session_guid = self.store.session_guid().await;
        let user_guid = self.store.user_guid().await;
        self.client
            .message_feedback(&session_guid, message_guid, &user_guid, feedback)
            .await?;
        self.store
            .set_message_feedback(message_guid, feedback)
            .await;
        Ok(())
    }

    /// Rate the whole session. A stored rating suppresses the feedback
    /// prompt stage of the inactivity cascade.
    pub async fn session_feedback(&self, rating: Option<u8>) -> Result<(), ClientError> {
        let session_guid = self.store.session_guid().await;
        let user_guid = self.store.user_guid().await;
        self.client
            .session_feedback(&session_guid, &user_guid, rating)
            .await?;
        self.store.set_session_feedback(rating).await;
        Ok(())
    }

    pub async fn bot_details(&self) -> Option<BotDetails> {
        self.lifecycle.bot_details().await
    }

    /// Disclaimer text to display, bot-configured when available.
    pub async fn disclaimer(&self) -> String {
        self.lifecycle
            .bot_details()
            .await
            .and_then(|bot| bot.configuration.disclaimer_message)
            .unwrap_or_else(|| self.config.disclaimer.clone())
    }

    pub fn tooltip_dismissed(&self) -> bool {
        self.identity.tooltip_dismissed()
    }

    pub fn dismiss_tooltip(&self) {
        self.identity.set_tooltip_dismissed(true);
    }

    /// Read access to the observable widget state.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }
}
