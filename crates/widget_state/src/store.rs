//! Session store
//!
//! The single mutable resource of the widget. Every component reads and
//! writes through the mutators here; each mutator takes the lock once, so
//! no caller can observe a torn intermediate state from another.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;
use widget_core::{Message, MessageFeedback};

/// Mode of the end-session control. `EndSession` is the default; the only
/// forward transition is to `ResetChat` (session ended or found
/// non-active), and only a full reset goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndButtonMode {
    EndSession,
    ResetChat,
}

impl Default for EndButtonMode {
    fn default() -> Self {
        EndButtonMode::EndSession
    }
}

#[derive(Default)]
struct StoreState {
    bot_guid: String,
    user_guid: String,
    session_guid: String,
    messages: Vec<Message>,
    is_msg_streaming: bool,
    ending_session: bool,
    track_inactivity: bool,
    error_message: String,
    end_button: EndButtonMode,
    /// Numeric session rating mirrored from the last status fetch.
    session_feedback: Option<u8>,
    /// Session guid whose backend end-call failed and should be retried.
    pending_remote_end: Option<String>,
    feedback_timer: Option<JoinHandle<()>>,
    end_session_timer: Option<JoinHandle<()>>,
}

/// Dependency-injected state container; create one per widget instance
/// (or per test).
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<StoreState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- identifiers ----

    pub async fn set_bot_guid(&self, guid: impl Into<String>) {
        self.inner.write().await.bot_guid = guid.into();
    }

    pub async fn bot_guid(&self) -> String {
        self.inner.read().await.bot_guid.clone()
    }

    pub async fn set_user_guid(&self, guid: impl Into<String>) {
        self.inner.write().await.user_guid = guid.into();
    }

    pub async fn user_guid(&self) -> String {
        self.inner.read().await.user_guid.clone()
    }

    pub async fn set_session_guid(&self, guid: impl Into<String>) {
        self.inner.write().await.session_guid = guid.into();
    }

    pub async fn session_guid(&self) -> String {
        self.inner.read().await.session_guid.clone()
    }

    // ---- messages ----

    pub async fn append_message(&self, message: Message) {
        self.inner.write().await.messages.push(message);
    }

    /// Replace the full message list, e.g. when history is fetched.
    pub async fn set_messages(&self, messages: Vec<Message>) {
        self.inner.write().await.messages = messages;
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.read().await.messages.clone()
    }

    pub async fn message_count(&self) -> usize {
        self.inner.read().await.messages.len()
    }

    pub async fn message_by_guid(&self, guid: &str) -> Option<Message> {
        self.inner
            .read()
            .await
            .messages
            .iter()
            .find(|m| m.guid == guid)
            .cloned()
    }

    pub async fn last_message(&self) -> Option<Message> {
        self.inner.read().await.messages.last().cloned()
    }

    pub async fn remove_message_by_guid(&self, guid: &str) {
        self.inner.write().await.messages.retain(|m| m.guid != guid);
    }

    /// Swap a provisional guid for the server-issued one, preserving the
    /// message's slot in the list.
    pub async fn update_message_guid(&self, original_guid: &str, new_guid: &str) {
        let mut state = self.inner.write().await;
        if let Some(message) = state.messages.iter_mut().find(|m| m.guid == original_guid) {
            message.guid = new_guid.to_string();
        }
    }

    pub async fn clear_provisional(&self, guid: &str) {
        let mut state = self.inner.write().await;
        if let Some(message) = state.messages.iter_mut().find(|m| m.guid == guid) {
            message.provisional = false;
        }
    }

    pub async fn set_message_feedback(&self, guid: &str, feedback: Option<MessageFeedback>) {
        let mut state = self.inner.write().await;
        if let Some(message) = state.messages.iter_mut().find(|m| m.guid == guid) {
            message.feedback = feedback;
        }
    }

    pub async fn append_token(&self, guid: &str, token: &str) {
        let mut state = self.inner.write().await;
        if let Some(message) = state.messages.iter_mut().find(|m| m.guid == guid) {
            message.content.push_str(token);
        }
    }

    // ---- streaming gate ----

    /// Atomically claim the streaming flag. Returns false when an
    /// exchange is already in flight; the caller must treat that as a
    /// no-op submission.
    pub async fn try_begin_streaming(&self) -> bool {
        let mut state = self.inner.write().await;
        if state.is_msg_streaming {
            return false;
        }
        state.is_msg_streaming = true;
        true
    }

    pub async fn end_streaming(&self) {
        self.inner.write().await.is_msg_streaming = false;
    }

    pub async fn is_streaming(&self) -> bool {
        self.inner.read().await.is_msg_streaming
    }

    // ---- end-session re-entrancy gate ----

    pub async fn try_begin_ending(&self) -> bool {
        let mut state = self.inner.write().await;
        if state.ending_session || state.is_msg_streaming {
            return false;
        }
        state.ending_session = true;
        true
    }

    pub async fn finish_ending(&self) {
        self.inner.write().await.ending_session = false;
    }

    pub async fn is_ending(&self) -> bool {
        self.inner.read().await.ending_session
    }

    // ---- flags and error text ----

    pub async fn set_track_inactivity(&self, track: bool) {
        self.inner.write().await.track_inactivity = track;
    }

    pub async fn track_inactivity(&self) -> bool {
        self.inner.read().await.track_inactivity
    }

    pub async fn set_error_message(&self, message: impl Into<String>) {
        self.inner.write().await.error_message = message.into();
    }

    pub async fn clear_error_message(&self) {
        self.inner.write().await.error_message.clear();
    }

    pub async fn error_message(&self) -> String {
        self.inner.read().await.error_message.clone()
    }

    pub async fn set_end_button(&self, mode: EndButtonMode) {
        self.inner.write().await.end_button = mode;
    }

    pub async fn end_button(&self) -> EndButtonMode {
        self.inner.read().await.end_button
    }

    pub async fn set_session_feedback(&self, feedback: Option<u8>) {
        self.inner.write().await.session_feedback = feedback;
    }

    pub async fn session_feedback(&self) -> Option<u8> {
        self.inner.read().await.session_feedback
    }

    pub async fn set_pending_remote_end(&self, session_guid: impl Into<String>) {
        self.inner.write().await.pending_remote_end = Some(session_guid.into());
    }

    pub async fn take_pending_remote_end(&self) -> Option<String> {
        self.inner.write().await.pending_remote_end.take()
    }

    // ---- timer handles ----

    /// Arm the feedback timer, cancelling any previously armed one
    /// (last-write-wins).
    pub async fn set_feedback_timer(&self, handle: JoinHandle<()>) {
        let mut state = self.inner.write().await;
        if let Some(previous) = state.feedback_timer.replace(handle) {
            debug!("replacing armed feedback timer");
            previous.abort();
        }
    }

    pub async fn clear_feedback_timer(&self) {
        if let Some(handle) = self.inner.write().await.feedback_timer.take() {
            debug!("clearing feedback timer");
            handle.abort();
        }
    }

    /// Drop the stored handle without aborting it. Called by the timer
    /// task itself once it fires, so a later clear cannot abort the
    /// callback mid-run.
    pub async fn discard_feedback_timer(&self) {
        self.inner.write().await.feedback_timer.take();
    }

    pub async fn has_feedback_timer(&self) -> bool {
        self.inner.read().await.feedback_timer.is_some()
    }

    /// Arm the session-end timer, cancelling any previously armed one.
    pub async fn set_session_end_timer(&self, handle: JoinHandle<()>) {
        let mut state = self.inner.write().await;
        if let Some(previous) = state.end_session_timer.replace(handle) {
            debug!("replacing armed session end timer");
            previous.abort();
        }
    }

    pub async fn clear_session_end_timer(&self) {
        if let Some(handle) = self.inner.write().await.end_session_timer.take() {
            debug!("clearing session end timer");
            handle.abort();
        }
    }

    /// See [`Self::discard_feedback_timer`].
    pub async fn discard_session_end_timer(&self) {
        self.inner.write().await.end_session_timer.take();
    }

    pub async fn has_session_end_timer(&self) -> bool {
        self.inner.read().await.end_session_timer.is_some()
    }

    // ---- reset ----

    /// Clear all session-scoped state: messages, streaming flag, both
    /// timers (aborting pending callbacks), session guid, error text,
    /// and the end-button mode. The user and bot guids survive.
    pub async fn reset(&self) {
        let mut state = self.inner.write().await;
        if let Some(handle) = state.feedback_timer.take() {
            handle.abort();
        }
        if let Some(handle) = state.end_session_timer.take() {
            handle.abort();
        }
        state.session_guid.clear();
        state.messages.clear();
        state.is_msg_streaming = false;
        state.ending_session = false;
        state.track_inactivity = false;
        state.error_message.clear();
        state.end_button = EndButtonMode::EndSession;
        state.session_feedback = None;
        debug!("session store reset");
    }
}
