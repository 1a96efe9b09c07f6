//! Common library for the recipe service
//!
//! This crate holds the infrastructure pieces shared by the service binary:
//! PostgreSQL connection pooling, the Redis client wrapper, and the error
//! types for both.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let healthy = health_check(&pool).await?;
//!     println!("database healthy: {}", healthy);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod database;
pub mod error;
