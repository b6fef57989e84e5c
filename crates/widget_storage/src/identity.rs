//! Identity gateway
//!
//! Generates and persists the opaque widget identifiers. Pure data
//! access: no session or lifecycle rules live here.

use std::sync::Arc;

use widget_core::generate_guid;

use crate::storage::KeyValueStorage;
use crate::{SESSION_GUID_KEY, TOOLTIP_DISMISSED_KEY, USER_GUID_KEY};

#[derive(Clone)]
pub struct IdentityGateway {
    storage: Arc<dyn KeyValueStorage>,
}

impl IdentityGateway {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The persistent user guid, created and stored on first use.
    pub fn user_guid(&self) -> String {
        if let Some(guid) = self.storage.get(USER_GUID_KEY) {
            if !guid.is_empty() {
                return guid;
            }
        }

        let guid = generate_guid();
        self.storage.set(USER_GUID_KEY, &guid);
        guid
    }

    /// The session guid from a previous visit, if one was persisted.
    pub fn session_guid(&self) -> Option<String> {
        self.storage.get(SESSION_GUID_KEY).filter(|g| !g.is_empty())
    }

    pub fn store_session_guid(&self, guid: &str) {
        self.storage.set(SESSION_GUID_KEY, guid);
    }

    pub fn clear_session_guid(&self) {
        self.storage.remove(SESSION_GUID_KEY);
    }

    pub fn tooltip_dismissed(&self) -> bool {
        self.storage
            .get(TOOLTIP_DISMISSED_KEY)
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    pub fn set_tooltip_dismissed(&self, dismissed: bool) {
        self.storage
            .set(TOOLTIP_DISMISSED_KEY, if dismissed { "true" } else { "false" });
    }
}
