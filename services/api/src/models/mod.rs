//! Data models for the recipe service

pub mod recipe;
pub mod user;

// Re-export for convenience
pub use recipe::{Recipe, RecipeDraft};
pub use user::User;
