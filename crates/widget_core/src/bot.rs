//! Bot metadata as served by the bot details endpoint.

use serde::{Deserialize, Serialize};

/// Display and fallback-text configuration a bot owner can customize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfiguration {
    #[serde(default)]
    pub greeting_message: Option<String>,
    #[serde(default)]
    pub feedback_message: Option<String>,
    #[serde(default)]
    pub goodbye_message: Option<String>,
    #[serde(default)]
    pub disclaimer_message: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
}

/// Bot details payload. A bot is only usable while its processing status
/// is "success".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotDetails {
    #[serde(default)]
    pub guid: Option<String>,
    pub status: String,
    #[serde(default)]
    pub configuration: BotConfiguration,
}

impl BotDetails {
    pub fn is_ready(&self) -> bool {
        self.status == "success"
    }
}
