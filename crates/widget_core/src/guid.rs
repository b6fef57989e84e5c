//! Guid generation helpers.

use uuid::Uuid;

/// Generate a 32-character lowercase hex guid (uuid v4 without dashes),
/// the format the backend validates identifiers against.
pub fn generate_guid() -> String {
    Uuid::new_v4().simple().to_string()
}
