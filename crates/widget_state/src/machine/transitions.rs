//! Exchange transitions - event-driven phase changes.

use tracing::trace;

use super::events::ExchangeEvent;
use super::states::ExchangePhase;

/// Record of one handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeTransition {
    pub from: ExchangePhase,
    pub to: ExchangePhase,
    pub event: ExchangeEvent,
    /// Whether the phase actually changed.
    pub changed: bool,
}

/// State machine for one streaming exchange. Terminal phases absorb all
/// further events, which is what makes replaying a completion event a
/// no-op by construction.
#[derive(Debug, Clone, Default)]
pub struct ExchangeMachine {
    current: ExchangePhase,
}

impl ExchangeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ExchangePhase {
        self.current
    }

    /// Handle an event and move to the next phase.
    pub fn handle_event(&mut self, event: ExchangeEvent) -> ExchangeTransition {
        let from = self.current;
        let to = Self::next_phase(from, event);
        self.current = to;

        let transition = ExchangeTransition {
            from,
            to,
            event,
            changed: from != to,
        };
        trace!(?from, ?to, ?event, "exchange transition");
        transition
    }

    fn next_phase(phase: ExchangePhase, event: ExchangeEvent) -> ExchangePhase {
        use ExchangeEvent::*;
        use ExchangePhase::*;

        if phase.is_terminal() {
            return phase;
        }

        match (phase, event) {
            (AwaitingFirstToken, TokenReceived) => Streaming,
            (Streaming, TokenReceived) => Streaming,

            (AwaitingFirstToken | Streaming, CompletionReceived) => Completed,

            (AwaitingFirstToken | Streaming, MalformedEvent) => Failed,
            (AwaitingFirstToken | Streaming, TransportError) => Aborted,
            (AwaitingFirstToken | Streaming, Cancelled) => Aborted,

            (Completed | Failed | Aborted, _) => phase,
        }
    }
}
