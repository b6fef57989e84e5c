use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Inactivity timer arming the feedback prompt, 30 seconds.
pub const DEFAULT_FEEDBACK_TIMER: Duration = Duration::from_secs(30);
/// Inactivity timer ending the session after the feedback prompt, 60 seconds.
pub const DEFAULT_END_SESSION_TIMER: Duration = Duration::from_secs(60);

pub const DEFAULT_ERROR_ON_SEND_MSG: &str = "Cannot send your message. Please check the message and try again. If the problem persists, please contact admin.";
pub const DEFAULT_ERROR_ON_SESSION_INACTIVE: &str = "You cannot send message to this conversation as it not active. Please start a new conversation.";
pub const DEFAULT_END_SESSION_CONFIRM_MSG: &str =
    "Are you sure you want to end this conversation?";
pub const DEFAULT_FEEDBACK_REQUEST_MSG: &str = "Please provide your feedback.";
pub const DEFAULT_GOODBYE_MESSAGE: &str = "Thank you for your time. Have a great day!";
pub const DEFAULT_DISCLAIMER_MSG: &str =
    "Bot responses are AI-generated and may contain inaccuracies.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Base URL of the session backend.
    pub api_base: String,
    /// Guid of the bot this widget instance talks to.
    pub bot_guid: String,
    pub feedback_timer: Duration,
    pub end_session_timer: Duration,
    pub error_on_send: String,
    pub error_on_session_inactive: String,
    pub end_session_confirm: String,
    pub fallback_feedback_request: String,
    pub fallback_goodbye: String,
    /// Shown under the conversation; a bot-configured text overrides it.
    pub disclaimer: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetConfig {
    pub fn new() -> Self {
        let mut config = WidgetConfig {
            api_base: String::new(),
            bot_guid: String::new(),
            feedback_timer: DEFAULT_FEEDBACK_TIMER,
            end_session_timer: DEFAULT_END_SESSION_TIMER,
            error_on_send: DEFAULT_ERROR_ON_SEND_MSG.to_string(),
            error_on_session_inactive: DEFAULT_ERROR_ON_SESSION_INACTIVE.to_string(),
            end_session_confirm: DEFAULT_END_SESSION_CONFIRM_MSG.to_string(),
            fallback_feedback_request: DEFAULT_FEEDBACK_REQUEST_MSG.to_string(),
            fallback_goodbye: DEFAULT_GOODBYE_MESSAGE.to_string(),
            disclaimer: DEFAULT_DISCLAIMER_MSG.to_string(),
        };

        if let Ok(api_base) = std::env::var("CHAT_WIDGET_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(bot_guid) = std::env::var("CHAT_WIDGET_BOT_GUID") {
            config.bot_guid = bot_guid;
        }
        config
    }

    pub fn with_endpoint(api_base: impl Into<String>, bot_guid: impl Into<String>) -> Self {
        let mut config = Self::new();
        config.api_base = api_base.into();
        config.bot_guid = bot_guid.into();
        config
    }
}
