//! Error types shared across the workspace

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors raised by the database layer
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a connection to PostgreSQL
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A query failed to execute
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Invalid or missing configuration
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
