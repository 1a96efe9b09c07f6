//! Repositories for database operations

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

pub mod recipe;
pub mod user;

pub use recipe::{PgRecipeStore, RecipeStore};
pub use user::UserRepository;

/// Create the tables the service needs if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recipes (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            tags TEXT[] NOT NULL DEFAULT '{}',
            ingredients TEXT[] NOT NULL DEFAULT '{}',
            instructions TEXT[] NOT NULL DEFAULT '{}',
            published_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
