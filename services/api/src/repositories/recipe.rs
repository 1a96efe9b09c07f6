//! Recipe storage

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Recipe, RecipeDraft};

/// Persistent collection of recipes.
///
/// The production implementation is PostgreSQL-backed; tests substitute an
/// in-memory double.
pub trait RecipeStore {
    async fn find_all(&self) -> Result<Vec<Recipe>>;
    async fn insert(&self, recipe: &Recipe) -> Result<()>;
    /// Replace the mutable fields of a recipe. Returns the updated row, or
    /// `None` when no recipe has the given id. The publish time is untouched.
    async fn update(&self, id: Uuid, draft: &RecipeDraft) -> Result<Option<Recipe>>;
    /// Returns false when no recipe had the given id.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// PostgreSQL-backed recipe store
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn recipe_from_row(row: &PgRow) -> Recipe {
    Recipe {
        id: row.get("id"),
        name: row.get("name"),
        tags: row.get("tags"),
        ingredients: row.get("ingredients"),
        instructions: row.get("instructions"),
        published_at: row.get("published_at"),
    }
}

impl RecipeStore for PgRecipeStore {
    async fn find_all(&self) -> Result<Vec<Recipe>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, tags, ingredients, instructions, published_at
            FROM recipes
            ORDER BY published_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(recipe_from_row).collect())
    }

    async fn insert(&self, recipe: &Recipe) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO recipes (id, name, tags, ingredients, instructions, published_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(recipe.id)
        .bind(&recipe.name)
        .bind(&recipe.tags)
        .bind(&recipe.ingredients)
        .bind(&recipe.instructions)
        .bind(recipe.published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, draft: &RecipeDraft) -> Result<Option<Recipe>> {
        let row = sqlx::query(
            r#"
            UPDATE recipes
            SET name = $2, tags = $3, ingredients = $4, instructions = $5
            WHERE id = $1
            RETURNING id, name, tags, ingredients, instructions, published_at
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.tags)
        .bind(&draft.ingredients)
        .bind(&draft.instructions)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(recipe_from_row))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
