//! Exchange events - channel observations that drive phase transitions.

use serde::{Deserialize, Serialize};

/// What arrived (or happened to) the server-push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeEvent {
    /// A token payload extended the bot answer.
    TokenReceived,

    /// The completion payload carrying the server-issued guids.
    CompletionReceived,

    /// A payload that is neither a token nor a completion.
    MalformedEvent,

    /// The channel dropped or errored at transport level.
    TransportError,

    /// The exchange was cancelled client-side (popover closed).
    Cancelled,
}

impl ExchangeEvent {
    /// Events that end the exchange without a confirmed answer.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedEvent | Self::TransportError | Self::Cancelled
        )
    }
}
