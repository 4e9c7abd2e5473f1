//! CookUp Core Library
//!
//! Shared types and logic for CookUp applications: the TheMealDB lookup
//! client and the favorites reconciliation core.

pub mod auth;
pub mod favorites;
pub mod meals;
pub mod models;

pub use auth::{AuthState, AuthWatcher};
pub use favorites::{
    FavoriteStore, FavoritesFile, LocalStoreError, RemoteError, RemoteFavorites, RestRemote,
    FAVORITES_KEY,
};
pub use meals::{MealService, MealServiceError, DEFAULT_BASE_URL};
pub use models::{IngredientInfo, IngredientLine, IngredientResponse, Meal, MealResponse};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
