//! Cascading inactivity timers
//!
//! After the bot finishes a plain answer the conversation is considered
//! idle. A first timer fires a feedback prompt; a second, longer timer
//! ends the session with a goodbye. Any user activity cancels both, and
//! a session that already carries a rating skips straight to the
//! end-session timer.

use std::sync::Arc;

use session_client::SessionApi;
use tokio::time::sleep;
use tracing::{debug, warn};
use widget_core::{TriggerKind, WidgetConfig};
use widget_state::SessionStore;

use crate::collaborators::{ErrorContext, ErrorReporter};
use crate::lifecycle::SessionLifecycle;

pub struct InactivityTimerEngine {
    store: Arc<SessionStore>,
    client: Arc<dyn SessionApi>,
    lifecycle: Arc<SessionLifecycle>,
    config: WidgetConfig,
    reporter: Arc<dyn ErrorReporter>,
}

impl InactivityTimerEngine {
    pub fn new(
        store: Arc<SessionStore>,
        client: Arc<dyn SessionApi>,
        lifecycle: Arc<SessionLifecycle>,
        config: WidgetConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            store,
            client,
            lifecycle,
            config,
            reporter,
        }
    }

    /// Re-evaluate the timers after the message list changed.
    ///
    /// Timers only arm while inactivity tracking is on and the newest
    /// message is a plain bot answer; prompts, fallbacks and user
    /// messages never count as idle points. A session the user already
    /// rated goes directly to the end-session timer.
    pub async fn on_messages_changed(self: &Arc<Self>) {
        if !self.store.track_inactivity().await {
            return;
        }
        let Some(last) = self.store.last_message().await else {
            return;
        };
        if !last.is_plain_bot_message() {
            return;
        }

        if self.store.session_feedback().await.is_some() {
            debug!("session already rated, skipping feedback prompt");
            self.store.clear_feedback_timer().await;
            self.arm_session_end_timer().await;
        } else {
            self.arm_feedback_timer().await;
        }
    }

    /// Cancel both timers. Called on any user interaction.
    pub async fn user_activity(&self) {
        self.store.clear_feedback_timer().await;
        self.store.clear_session_end_timer().await;
    }

    async fn arm_feedback_timer(self: &Arc<Self>) {
        let engine = Arc::clone(self);
        // Fix the deadline now, not when the spawned task first runs.
        let delay = sleep(self.config.feedback_timer);
        let handle = tokio::spawn(async move {
            delay.await;
            engine.fire_feedback_prompt().await;
        });
        self.store.set_feedback_timer(handle).await;
    }

    /// First stage: post the feedback prompt, then start the countdown
    /// to the session-ending goodbye.
    async fn fire_feedback_prompt(self: &Arc<Self>) {
        // Detach our own handle so a later clear cannot abort this task.
        self.store.discard_feedback_timer().await;

        let session_guid = self.store.session_guid().await;
        let user_guid = self.store.user_guid().await;

        match self
            .client
            .trigger_bot_message(
                &session_guid,
                &user_guid,
                TriggerKind::FeedbackRequestedMessage,
            )
            .await
        {
            Ok(message) => self.store.append_message(message).await,
            Err(err) => {
                warn!("error triggering feedback prompt: {}", err);
                self.reporter.record(
                    &err.to_string(),
                    ErrorContext::new(&session_guid, &user_guid)
                        .with_detail(TriggerKind::FeedbackRequestedMessage.as_str()),
                );
            }
        }

        self.arm_session_end_timer().await;
    }

    /// Second stage: after the longer timeout, end the session without a
    /// confirmation dialog, goodbye flow only. The feedback prompt is
    /// already on screen, so it is not re-triggered.
    async fn arm_session_end_timer(self: &Arc<Self>) {
        let store = Arc::clone(&self.store);
        let lifecycle = Arc::clone(&self.lifecycle);
        // Fix the deadline now, not when the spawned task first runs.
        let delay = sleep(self.config.end_session_timer);
        let handle = tokio::spawn(async move {
            delay.await;
            // end_session clears both timers; detach first so that clear
            // does not abort this very task.
            store.discard_session_end_timer().await;
            lifecycle
                .end_session(false, &[TriggerKind::GoodbyeMessage])
                .await;
        });
        self.store.set_session_end_timer(handle).await;
    }
}
