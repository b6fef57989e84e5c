//! Exchange phases - the states of one streaming answer exchange.

use serde::{Deserialize, Serialize};

/// Lifecycle of one question/answer exchange over the server-push
/// channel, from submission to a terminal outcome.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExchangePhase {
    /// Channel is open, no token has arrived yet.
    AwaitingFirstToken,

    /// At least one token has arrived; the bot answer is growing.
    Streaming,

    /// Terminal: the completion event was processed (success).
    Completed,

    /// Terminal: a malformed payload arrived.
    Failed,

    /// Terminal: the transport dropped, or the exchange was cancelled.
    Aborted,
}

impl Default for ExchangePhase {
    fn default() -> Self {
        ExchangePhase::AwaitingFirstToken
    }
}

impl ExchangePhase {
    /// Terminal phases accept no further events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Aborted)
    }

    /// Only the completed phase keeps the exchange's messages confirmed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn description(&self) -> &str {
        match self {
            Self::AwaitingFirstToken => "Waiting for the answer",
            Self::Streaming => "Receiving the answer",
            Self::Completed => "Answer received",
            Self::Failed => "Answer failed",
            Self::Aborted => "Answer aborted",
        }
    }
}
