use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod cache;
mod error;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod service;
mod session;
mod state;
mod validation;

use common::cache::{RedisConfig, RedisPool};
use common::database::{DatabaseConfig, init_pool};

use crate::cache::RedisSnapshotCache;
use crate::jwt::{JwtConfig, JwtService};
use crate::repositories::{PgRecipeStore, UserRepository};
use crate::service::RecipeService;
use crate::session::{DEFAULT_SESSION_TTL, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting recipe service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    repositories::init_schema(&pool).await?;

    // Initialize Redis
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    // Initialize token signing
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    let session_ttl = std::env::var("SESSION_TTL_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SESSION_TTL);

    let recipes = RecipeService::new(
        PgRecipeStore::new(pool.clone()),
        RedisSnapshotCache::new(redis_pool.clone()),
    );
    let users = UserRepository::new(pool);
    let sessions = SessionStore::new(redis_pool, session_ttl);

    let app_state = AppState {
        recipes,
        users,
        sessions,
        jwt: jwt_service,
    };

    info!("Recipe service initialized successfully");

    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    info!("Recipe service listening on 0.0.0.0:8080");

    axum::serve(listener, app).await?;

    Ok(())
}
