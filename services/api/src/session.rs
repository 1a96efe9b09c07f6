//! Server-side session records
//!
//! Sessions live in Redis under `session:<token>`, mapping an opaque token
//! to the signed-in username. They are created on sign-in, removed on
//! sign-out, and expire on their own after the configured TTL.

use anyhow::Result;
use common::cache::RedisPool;
use tracing::info;
use uuid::Uuid;

/// Default session lifetime in seconds (one day)
pub const DEFAULT_SESSION_TTL: u64 = 86_400;

/// Session repository keyed by opaque token
#[derive(Clone)]
pub struct SessionStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl SessionStore {
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token: &str) -> String {
        format!("session:{}", token)
    }

    /// Create a session for a username and return the fresh token
    pub async fn create(&self, username: &str) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        self.pool
            .set(&Self::key(&token), username, Some(self.ttl_seconds))
            .await?;

        info!("Created session for {}", username);
        Ok(token)
    }

    /// Look up the username a token belongs to
    pub async fn lookup(&self, token: &str) -> Result<Option<String>> {
        self.pool.get(&Self::key(token)).await
    }

    /// Remove a session. Removing an unknown token is not an error.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.pool.delete(&Self::key(token)).await
    }
}
