//! Recipe operations and the cache consistency policy
//!
//! Reads go through the snapshot cache; every successful write deletes the
//! snapshot instead of patching it, so the next list rebuilds it from the
//! store. Nothing coordinates a write's invalidation with a concurrent
//! read's repopulation, so a read that loaded before a write can restore
//! pre-write data until the next invalidation. That staleness is accepted.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::SnapshotCache;
use crate::models::{Recipe, RecipeDraft};
use crate::repositories::RecipeStore;

/// Errors from recipe operations
#[derive(Error, Debug)]
pub enum RecipeError {
    /// No recipe with the requested id
    #[error("recipe not found")]
    NotFound,

    /// The persistent store failed
    #[error("store error")]
    Store(#[source] anyhow::Error),

    /// The cache failed while serving a read
    #[error("cache error")]
    Cache(#[source] anyhow::Error),
}

/// Orchestrates reads and writes between the recipe store and the snapshot
/// cache
#[derive(Clone)]
pub struct RecipeService<S, C> {
    store: S,
    cache: C,
}

impl<S: RecipeStore, C: SnapshotCache> RecipeService<S, C> {
    pub fn new(store: S, cache: C) -> Self {
        Self { store, cache }
    }

    /// Persist a new recipe and invalidate the list snapshot
    pub async fn create(&self, draft: RecipeDraft) -> Result<Recipe, RecipeError> {
        let recipe = Recipe {
            id: Uuid::new_v4(),
            name: draft.name,
            tags: draft.tags,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            published_at: Utc::now(),
        };

        self.store
            .insert(&recipe)
            .await
            .map_err(RecipeError::Store)?;
        self.invalidate_snapshot().await;

        info!("Created recipe {}", recipe.id);
        Ok(recipe)
    }

    /// List all recipes, serving from the cache when a snapshot is populated
    pub async fn list(&self) -> Result<Vec<Recipe>, RecipeError> {
        match self.cache.get().await.map_err(RecipeError::Cache)? {
            Some(snapshot) => {
                info!("Serving recipe list from cache");
                serde_json::from_str(&snapshot).map_err(|e| RecipeError::Cache(e.into()))
            }
            None => {
                info!("Recipe list cache miss, reading from store");
                let recipes = self.store.find_all().await.map_err(RecipeError::Store)?;

                match serde_json::to_string(&recipes) {
                    Ok(snapshot) => {
                        if let Err(e) = self.cache.put(&snapshot).await {
                            warn!("Failed to repopulate recipe snapshot: {:#}", e);
                        }
                    }
                    Err(e) => warn!("Failed to serialize recipe snapshot: {}", e),
                }

                Ok(recipes)
            }
        }
    }

    /// Replace a recipe's fields, keeping its id and publish time
    pub async fn update(&self, id: Uuid, draft: RecipeDraft) -> Result<Recipe, RecipeError> {
        let updated = self
            .store
            .update(id, &draft)
            .await
            .map_err(RecipeError::Store)?
            .ok_or(RecipeError::NotFound)?;

        self.invalidate_snapshot().await;

        info!("Updated recipe {}", id);
        Ok(updated)
    }

    /// Remove a recipe and invalidate the list snapshot
    pub async fn delete(&self, id: Uuid) -> Result<(), RecipeError> {
        let removed = self.store.delete(id).await.map_err(RecipeError::Store)?;
        if !removed {
            return Err(RecipeError::NotFound);
        }

        self.invalidate_snapshot().await;

        info!("Deleted recipe {}", id);
        Ok(())
    }

    // The write has already committed to the store; a failed invalidation
    // leaves a stale snapshot but never fails the request.
    async fn invalidate_snapshot(&self) {
        if let Err(e) = self.cache.invalidate().await {
            warn!("Failed to invalidate recipe snapshot: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryStore {
        recipes: Mutex<Vec<Recipe>>,
        reads: AtomicUsize,
    }

    impl RecipeStore for &MemoryStore {
        async fn find_all(&self) -> Result<Vec<Recipe>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.recipes.lock().unwrap().clone())
        }

        async fn insert(&self, recipe: &Recipe) -> Result<()> {
            self.recipes.lock().unwrap().push(recipe.clone());
            Ok(())
        }

        async fn update(&self, id: Uuid, draft: &RecipeDraft) -> Result<Option<Recipe>> {
            let mut recipes = self.recipes.lock().unwrap();
            match recipes.iter_mut().find(|r| r.id == id) {
                Some(recipe) => {
                    recipe.name = draft.name.clone();
                    recipe.tags = draft.tags.clone();
                    recipe.ingredients = draft.ingredients.clone();
                    recipe.instructions = draft.instructions.clone();
                    Ok(Some(recipe.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, id: Uuid) -> Result<bool> {
            let mut recipes = self.recipes.lock().unwrap();
            let before = recipes.len();
            recipes.retain(|r| r.id != id);
            Ok(recipes.len() < before)
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entry: Mutex<Option<String>>,
        fail_reads: bool,
        fail_invalidation: bool,
    }

    impl SnapshotCache for &MemoryCache {
        async fn get(&self) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(anyhow!("cache down"));
            }
            Ok(self.entry.lock().unwrap().clone())
        }

        async fn put(&self, snapshot: &str) -> Result<()> {
            *self.entry.lock().unwrap() = Some(snapshot.to_string());
            Ok(())
        }

        async fn invalidate(&self) -> Result<()> {
            if self.fail_invalidation {
                return Err(anyhow!("cache down"));
            }
            *self.entry.lock().unwrap() = None;
            Ok(())
        }
    }

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            tags: vec!["drink".to_string()],
            ingredients: vec!["water".to_string(), "leaves".to_string()],
            instructions: vec!["boil".to_string(), "steep".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let service = RecipeService::new(&store, &cache);

        let first = service.create(draft("Tea")).await.unwrap();
        let second = service.create(draft("Coffee")).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_create_invalidates_snapshot() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        *cache.entry.lock().unwrap() = Some("[]".to_string());

        let service = RecipeService::new(&store, &cache);
        service.create(draft("Tea")).await.unwrap();

        assert!(cache.entry.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_populates_snapshot_once() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let service = RecipeService::new(&store, &cache);

        service.create(draft("Tea")).await.unwrap();

        let first = service.list().await.unwrap();
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
        assert!(cache.entry.lock().unwrap().is_some());

        // Second list is a cache hit; the store is not consulted again.
        let second = service.list().await.unwrap();
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn test_snapshot_hit_serves_stale_data_until_invalidated() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let service = RecipeService::new(&store, &cache);

        let tea = service.create(draft("Tea")).await.unwrap();
        service.list().await.unwrap();

        // A writer that bypasses the service leaves the snapshot stale, and
        // the hit path trusts the snapshot without checking the store.
        store.recipes.lock().unwrap().clear();

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, tea.id);

        // The next write through the service drops the snapshot.
        service.create(draft("Coffee")).await.unwrap();
        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Coffee");
    }

    #[tokio::test]
    async fn test_update_preserves_id_and_publish_time() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let service = RecipeService::new(&store, &cache);

        let created = service.create(draft("Tea")).await.unwrap();
        let updated = service.update(created.id, draft("Green tea")).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.published_at, created.published_at);
        assert_eq!(updated.name, "Green tea");
    }

    #[tokio::test]
    async fn test_update_invalidates_snapshot() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let service = RecipeService::new(&store, &cache);

        let created = service.create(draft("Tea")).await.unwrap();
        service.list().await.unwrap();
        assert!(cache.entry.lock().unwrap().is_some());

        service.update(created.id, draft("Green tea")).await.unwrap();
        assert!(cache.entry.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_recipe_is_not_found() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let service = RecipeService::new(&store, &cache);

        let result = service.update(Uuid::new_v4(), draft("Tea")).await;
        assert!(matches!(result, Err(RecipeError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_then_list_excludes_the_recipe() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let service = RecipeService::new(&store, &cache);

        let tea = service.create(draft("Tea")).await.unwrap();
        let coffee = service.create(draft("Coffee")).await.unwrap();
        service.list().await.unwrap();

        service.delete(tea.id).await.unwrap();

        let listed = service.list().await.unwrap();
        assert!(listed.iter().all(|r| r.id != tea.id));
        assert!(listed.iter().any(|r| r.id == coffee.id));
    }

    #[tokio::test]
    async fn test_delete_missing_recipe_is_not_found() {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let service = RecipeService::new(&store, &cache);

        let result = service.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RecipeError::NotFound)));
    }

    #[tokio::test]
    async fn test_write_survives_failed_invalidation() {
        let store = MemoryStore::default();
        let cache = MemoryCache {
            fail_invalidation: true,
            ..MemoryCache::default()
        };
        *cache.entry.lock().unwrap() = Some("[]".to_string());

        let service = RecipeService::new(&store, &cache);
        let created = service.create(draft("Tea")).await.unwrap();

        // The write landed in the store even though the snapshot is stale.
        assert_eq!(store.recipes.lock().unwrap().len(), 1);
        assert_eq!(store.recipes.lock().unwrap()[0].id, created.id);
        assert!(cache.entry.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_surfaces_cache_read_failure() {
        let store = MemoryStore::default();
        let cache = MemoryCache {
            fail_reads: true,
            ..MemoryCache::default()
        };

        let service = RecipeService::new(&store, &cache);
        let result = service.list().await;

        assert!(matches!(result, Err(RecipeError::Cache(_))));
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
    }
}
