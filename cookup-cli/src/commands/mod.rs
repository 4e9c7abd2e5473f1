pub mod auth;
pub mod config_cmd;
pub mod favorites;
pub mod meals;

pub use auth::{LoginCommand, LogoutCommand, StatusCommand};
pub use config_cmd::ConfigCommand;
pub use favorites::FavoritesCommand;
pub use meals::{
    CategoryCommand, IngredientCommand, IngredientsCommand, RandomCommand, SearchCommand,
    ShowCommand,
};
