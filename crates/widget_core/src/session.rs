//! Session status types

use serde::{Deserialize, Serialize};

/// Lifecycle state of a session as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Inactive,
    /// Catch-all for wire values this client version does not know.
    #[serde(other)]
    Unknown,
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Unknown
    }
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Response of the session status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub status: SessionStatus,
    /// Satisfaction rating 1..=5, once the visitor has rated the session.
    #[serde(default)]
    pub feedback: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_values_fall_through() {
        let info: SessionInfo =
            serde_json::from_str(r#"{"status": "archived", "feedback": null}"#).unwrap();
        assert_eq!(info.status, SessionStatus::Unknown);
        assert!(!info.status.is_active());
    }

    #[test]
    fn active_status_with_rating() {
        let info: SessionInfo =
            serde_json::from_str(r#"{"status": "active", "feedback": 4}"#).unwrap();
        assert!(info.status.is_active());
        assert_eq!(info.feedback, Some(4));
    }
}
