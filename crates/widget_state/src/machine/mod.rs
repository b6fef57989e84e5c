//! Streaming-exchange state machine.

mod events;
mod states;
mod transitions;

pub use events::ExchangeEvent;
pub use states::ExchangePhase;
pub use transitions::{ExchangeMachine, ExchangeTransition};
