//! # Widget Core
//!
//! Shared data model for the embeddable chat widget client: messages,
//! session status, bot metadata, and configuration defaults.

pub mod bot;
pub mod config;
pub mod guid;
pub mod message;
pub mod session;

// Re-exports
pub use bot::{BotConfiguration, BotDetails};
pub use config::WidgetConfig;
pub use guid::generate_guid;
pub use message::{Message, MessageFeedback, MessageRole, TriggerKind};
pub use session::{SessionInfo, SessionStatus};
