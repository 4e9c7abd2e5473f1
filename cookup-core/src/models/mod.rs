mod ingredient;
mod meal;

pub use ingredient::{IngredientInfo, IngredientResponse};
pub use meal::{IngredientLine, Meal, MealResponse};
