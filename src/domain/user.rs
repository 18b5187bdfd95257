//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// User domain entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// True when every field is non-empty.
///
/// Presence is the only input rule; values are otherwise stored as given.
pub(crate) fn all_present(fields: &[&str]) -> bool {
    fields.iter().all(|f| !f.is_empty())
}
