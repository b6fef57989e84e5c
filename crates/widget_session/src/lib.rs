//! # Widget Session
//!
//! The client-side session/streaming state machine of the chat widget:
//! session lifecycle (create, end, reset), token-by-token answer
//! streaming with provisional-message reconciliation, and the cascading
//! inactivity timers that close an idle conversation.

pub mod collaborators;
pub mod inactivity;
pub mod lifecycle;
pub mod streaming;
pub mod widget;

pub use collaborators::{AutoConfirm, ConfirmPrompt, ErrorContext, ErrorReporter, LogReporter};
pub use inactivity::InactivityTimerEngine;
pub use lifecycle::SessionLifecycle;
pub use streaming::{StreamingAnswerController, SubmitOutcome};
pub use widget::ChatWidget;
