//! Input validation for request payloads

use regex::Regex;
use std::sync::OnceLock;

use crate::models::RecipeDraft;

/// Validate a username: 3-32 characters of letters, digits, and underscores
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate a password: 8-128 characters
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a recipe payload
pub fn validate_recipe(draft: &RecipeDraft) -> Result<(), String> {
    if draft.name.trim().is_empty() {
        return Err("Recipe name is required".to_string());
    }

    if draft.ingredients.is_empty() {
        return Err("Recipe needs at least one ingredient".to_string());
    }

    if draft.instructions.is_empty() {
        return Err("Recipe needs at least one instruction".to_string());
    }

    Ok(())
}
