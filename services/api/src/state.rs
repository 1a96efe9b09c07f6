//! Application state shared across handlers

use crate::cache::RedisSnapshotCache;
use crate::jwt::JwtService;
use crate::repositories::{PgRecipeStore, UserRepository};
use crate::service::RecipeService;
use crate::session::SessionStore;

/// The recipe service wired to its production collaborators
pub type Recipes = RecipeService<PgRecipeStore, RedisSnapshotCache>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub recipes: Recipes,
    pub users: UserRepository,
    pub sessions: SessionStore,
    pub jwt: JwtService,
}
