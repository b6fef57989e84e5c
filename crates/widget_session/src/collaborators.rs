//! External collaborators
//!
//! The core only needs two capabilities from its host: a yes/no
//! confirmation dialog and an error sink with context. Both are injected
//! as trait objects so tests and embedders supply their own.

use async_trait::async_trait;
use tracing::error;

/// Interactive yes/no confirmation, asked before ending a session.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Proceeds without asking. Embedders with a real dialog replace this.
pub struct AutoConfirm;

#[async_trait]
impl ConfirmPrompt for AutoConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Identifiers attached to a recorded error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub session_guid: String,
    pub user_guid: String,
    pub detail: Option<String>,
}

impl ErrorContext {
    pub fn new(session_guid: impl Into<String>, user_guid: impl Into<String>) -> Self {
        Self {
            session_guid: session_guid.into(),
            user_guid: user_guid.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Outbound error/telemetry sink. Every caught core failure is routed
/// through here with its context.
pub trait ErrorReporter: Send + Sync {
    fn record(&self, error: &str, context: ErrorContext);
}

/// Reporter that writes to the log instead of an external service.
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn record(&self, err: &str, context: ErrorContext) {
        error!(
            session_guid = %context.session_guid,
            user_guid = %context.user_guid,
            detail = ?context.detail,
            "{}",
            err
        );
    }
}
