//! Recipe list snapshot cache
//!
//! The full recipe collection is cached as one JSON blob under a fixed key.
//! Writes never patch the entry; they delete it, and the next list rebuilds
//! it from the store.

use anyhow::Result;
use common::cache::RedisPool;

/// Fixed key holding the serialized recipe list
const RECIPE_LIST_KEY: &str = "recipes";

/// Cache holding one serialized snapshot of the recipe collection
pub trait SnapshotCache {
    /// Fetch the current snapshot, if one is populated
    async fn get(&self) -> Result<Option<String>>;
    /// Store a snapshot with no expiry; it lives until the next invalidation
    async fn put(&self, snapshot: &str) -> Result<()>;
    /// Drop the snapshot. Dropping an absent snapshot is not an error.
    async fn invalidate(&self) -> Result<()>;
}

/// Redis-backed snapshot cache
#[derive(Clone)]
pub struct RedisSnapshotCache {
    pool: RedisPool,
}

impl RedisSnapshotCache {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

impl SnapshotCache for RedisSnapshotCache {
    async fn get(&self) -> Result<Option<String>> {
        self.pool.get(RECIPE_LIST_KEY).await
    }

    async fn put(&self, snapshot: &str) -> Result<()> {
        self.pool.set(RECIPE_LIST_KEY, snapshot, None).await
    }

    async fn invalidate(&self) -> Result<()> {
        self.pool.delete(RECIPE_LIST_KEY).await
    }
}
