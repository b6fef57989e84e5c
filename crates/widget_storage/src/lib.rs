//! # Widget Storage
//!
//! Durable key/value persistence for opaque widget identifiers, and the
//! identity gateway built on top of it. Storage being unavailable is
//! never an error here: every implementation degrades to in-memory-only
//! behavior without surfacing anything to callers.

pub mod identity;
pub mod storage;

pub use identity::IdentityGateway;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Storage key for the persisted session guid.
pub const SESSION_GUID_KEY: &str = "sessionGuid";
/// Storage key for the persisted user guid.
pub const USER_GUID_KEY: &str = "userGuid";
/// Storage key for the tooltip-dismissed flag.
pub const TOOLTIP_DISMISSED_KEY: &str = "tooltipDismissed";
