//! User model

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User record. Only the argon2 hash is ever stored; the record itself is
/// never serialized to clients.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
