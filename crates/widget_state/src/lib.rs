//! # Widget State
//!
//! The single authoritative in-memory state of the widget (session
//! store) plus the explicit state machine driving one streaming answer
//! exchange.

pub mod machine;
pub mod store;

pub use machine::{ExchangeEvent, ExchangeMachine, ExchangePhase, ExchangeTransition};
pub use store::{EndButtonMode, SessionStore};
