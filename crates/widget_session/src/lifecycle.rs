//! Session lifecycle controller
//!
//! Orchestrates session creation (adopting a persisted session when one
//! exists), the end-session wind-down with its templated trigger flows,
//! and the full reset that starts a fresh session under the same user.

use std::sync::Arc;

use session_client::{ClientError, SessionApi};
use tokio::sync::RwLock;
use tracing::{info, warn};
use widget_core::{BotDetails, Message, SessionInfo, TriggerKind, WidgetConfig};
use widget_state::{EndButtonMode, SessionStore};
use widget_storage::IdentityGateway;

use crate::collaborators::{ConfirmPrompt, ErrorContext, ErrorReporter};

pub struct SessionLifecycle {
    store: Arc<SessionStore>,
    client: Arc<dyn SessionApi>,
    identity: IdentityGateway,
    config: WidgetConfig,
    confirm: Arc<dyn ConfirmPrompt>,
    reporter: Arc<dyn ErrorReporter>,
    bot: RwLock<Option<BotDetails>>,
}

impl SessionLifecycle {
    pub fn new(
        store: Arc<SessionStore>,
        client: Arc<dyn SessionApi>,
        identity: IdentityGateway,
        config: WidgetConfig,
        confirm: Arc<dyn ConfirmPrompt>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            store,
            client,
            identity,
            config,
            confirm,
            reporter,
            bot: RwLock::new(None),
        }
    }

    /// Bring the widget up: establish the user identity, fetch the bot,
    /// create or adopt a session, then mirror status and history.
    ///
    /// Status and history failures are surfaced through the store rather
    /// than aborting startup; bot or session failures are fatal to it.
    pub async fn initialize(&self) -> Result<(), ClientError> {
        let user_guid = self.identity.user_guid();
        self.store.set_user_guid(&user_guid).await;
        self.store.set_bot_guid(&self.config.bot_guid).await;

        let bot = self.client.bot_details(&self.config.bot_guid).await?;
        if !bot.is_ready() {
            self.store
                .set_error_message(format!(
                    "This bot is in {} state. You can only interact with the bot when it is in success state.",
                    bot.status
                ))
                .await;
            *self.bot.write().await = Some(bot);
            return Ok(());
        }
        *self.bot.write().await = Some(bot);

        self.create_session().await?;

        if self.refresh_status().await.is_err() {
            return Ok(());
        }
        if let Err(err) = self.load_history().await {
            warn!("failed to load message history: {}", err);
        }
        Ok(())
    }

    pub async fn bot_details(&self) -> Option<BotDetails> {
        self.bot.read().await.clone()
    }

    /// Adopt the persisted session guid when one exists (no network
    /// call); otherwise request a new session and persist its guid.
    pub async fn create_session(&self) -> Result<(), ClientError> {
        self.flush_pending_remote_end().await;

        if let Some(existing) = self.identity.session_guid() {
            info!("adopting persisted session {}", existing);
            self.store.set_session_guid(&existing).await;
            return Ok(());
        }

        let user_guid = self.store.user_guid().await;
        match self
            .client
            .create_session(&self.config.bot_guid, &user_guid)
            .await
        {
            Ok(guid) => {
                self.identity.store_session_guid(&guid);
                self.store.set_session_guid(&guid).await;
                Ok(())
            }
            Err(err) => {
                self.reporter.record(
                    &err.to_string(),
                    ErrorContext::new("", &user_guid).with_detail("create_session"),
                );
                self.store.set_error_message(err.to_string()).await;
                Err(err)
            }
        }
    }

    /// Fetch the session status and mirror it into the store. A session
    /// that is not active disables the conversation: the inactive error
    /// text is surfaced and the end-session control flips to reset mode.
    pub async fn refresh_status(&self) -> Result<SessionInfo, ClientError> {
        let session_guid = self.store.session_guid().await;
        let user_guid = self.store.user_guid().await;

        match self.client.session_status(&session_guid, &user_guid).await {
            Ok(info) => {
                self.store.set_session_feedback(info.feedback).await;
                if !info.status.is_active() {
                    self.store
                        .set_error_message(&self.config.error_on_session_inactive)
                        .await;
                    self.store.set_end_button(EndButtonMode::ResetChat).await;
                }
                Ok(info)
            }
            Err(err) => {
                self.reporter.record(
                    &err.to_string(),
                    ErrorContext::new(&session_guid, &user_guid).with_detail("session_status"),
                );
                self.store
                    .set_error_message(&self.config.error_on_session_inactive)
                    .await;
                self.store.set_end_button(EndButtonMode::ResetChat).await;
                Err(err)
            }
        }
    }

    /// Load the session's message history into the store. Only replaces
    /// the list while it is still empty, so a resumed conversation never
    /// clobbers messages appended in this page load.
    pub async fn load_history(&self) -> Result<(), ClientError> {
        let session_guid = self.store.session_guid().await;
        let user_guid = self.store.user_guid().await;

        let messages = self.client.list_messages(&session_guid, &user_guid).await?;
        if self.store.message_count().await == 0 {
            self.store.set_messages(messages).await;
        }
        Ok(())
    }

    /// Wind the session down.
    ///
    /// No-op while a stream is in flight or another end is in progress.
    /// Cancels both inactivity timers, optionally asks for confirmation,
    /// runs the requested trigger flows in fixed order (feedback prompt
    /// first, then goodbye) with a locally-authored fallback message per
    /// failed trigger, then calls the backend to end the session. The
    /// control flips to reset mode regardless of the terminal call's
    /// outcome; a failed end call is remembered and retried on the next
    /// session creation.
    pub async fn end_session(&self, show_confirm: bool, triggers: &[TriggerKind]) {
        if !self.store.try_begin_ending().await {
            return;
        }

        self.store.clear_feedback_timer().await;
        self.store.clear_session_end_timer().await;

        if show_confirm
            && !self
                .confirm
                .confirm(&self.config.end_session_confirm)
                .await
        {
            self.store.finish_ending().await;
            return;
        }

        let session_guid = self.store.session_guid().await;
        let user_guid = self.store.user_guid().await;

        for kind in [
            TriggerKind::FeedbackRequestedMessage,
            TriggerKind::GoodbyeMessage,
        ] {
            if !triggers.contains(&kind) {
                continue;
            }
            match self
                .client
                .trigger_bot_message(&session_guid, &user_guid, kind)
                .await
            {
                Ok(message) => self.store.append_message(message).await,
                Err(err) => {
                    warn!("error triggering {}: {}", kind.as_str(), err);
                    self.reporter.record(
                        &err.to_string(),
                        ErrorContext::new(&session_guid, &user_guid)
                            .with_detail(kind.as_str()),
                    );
                    let content = self.fallback_text(kind).await;
                    self.store
                        .append_message(Message::local_trigger_fallback(kind, content))
                        .await;
                }
            }
        }

        match self.client.end_session(&session_guid, &user_guid).await {
            Ok(()) => {
                if let Ok(info) = self.client.session_status(&session_guid, &user_guid).await {
                    self.store.set_session_feedback(info.feedback).await;
                }
            }
            Err(err) => {
                warn!("error ending session: {}", err);
                self.reporter.record(
                    &err.to_string(),
                    ErrorContext::new(&session_guid, &user_guid).with_detail("end_session"),
                );
                self.store.set_pending_remote_end(&session_guid).await;
            }
        }

        self.store.finish_ending().await;
        self.store.set_end_button(EndButtonMode::ResetChat).await;
    }

    /// Discard all session-scoped state and immediately start a fresh
    /// session under the same user identity.
    pub async fn reset(&self) -> Result<(), ClientError> {
        self.identity.clear_session_guid();
        self.store.reset().await;
        self.create_session().await?;
        let _ = self.refresh_status().await;
        Ok(())
    }

    /// Retry the end call a previous wind-down could not deliver.
    /// Best-effort: a second failure is logged and dropped.
    async fn flush_pending_remote_end(&self) {
        if let Some(stale) = self.store.take_pending_remote_end().await {
            let user_guid = self.store.user_guid().await;
            if let Err(err) = self.client.end_session(&stale, &user_guid).await {
                warn!("retried end of stale session {} failed: {}", stale, err);
            }
        }
    }

    async fn fallback_text(&self, kind: TriggerKind) -> String {
        let bot = self.bot.read().await;
        let configured = bot.as_ref().and_then(|b| match kind {
            TriggerKind::FeedbackRequestedMessage => b.configuration.feedback_message.clone(),
            TriggerKind::GoodbyeMessage => b.configuration.goodbye_message.clone(),
        });
        configured.unwrap_or_else(|| match kind {
            TriggerKind::FeedbackRequestedMessage => {
                self.config.fallback_feedback_request.clone()
            }
            TriggerKind::GoodbyeMessage => self.config.fallback_goodbye.clone(),
        })
    }
}
