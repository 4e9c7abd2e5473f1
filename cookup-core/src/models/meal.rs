use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope returned by every TheMealDB endpoint.
///
/// The API answers `{"meals": null}` when a query has no results, so the
/// inner list is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct MealResponse {
    pub meals: Option<Vec<Meal>>,
}

/// A recipe record from TheMealDB.
///
/// Detail endpoints (`search.php`, `lookup.php`, `random.php`) return the
/// full record; filter endpoints return only id, name and thumbnail. The
/// positional `strIngredient1..20` / `strMeasure1..20` columns land in
/// `extra` and are paired up by [`Meal::ingredient_lines`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    #[serde(rename = "idMeal")]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default)]
    pub name: String,
    #[serde(rename = "strMealThumb")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategory", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "strArea", skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(rename = "strInstructions", skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Option<String>>,
}

impl Meal {
    /// Deduplication identity: the meal id, falling back to the name for
    /// records that arrive without one.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Pairs the non-empty `strIngredientN` columns with their matching
    /// `strMeasureN` values, in positional order.
    pub fn ingredient_lines(&self) -> Vec<IngredientLine> {
        let mut lines = Vec::new();
        for n in 1..=20 {
            let name = self
                .extra
                .get(&format!("strIngredient{n}"))
                .and_then(|v| v.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty());
            let Some(name) = name else { continue };
            let measure = self
                .extra
                .get(&format!("strMeasure{n}"))
                .and_then(|v| v.as_deref())
                .map(str::trim)
                .unwrap_or("")
                .to_string();
            lines.push(IngredientLine {
                name: name.to_string(),
                measure,
            });
        }
        lines
    }
}

/// One ingredient/measure pairing from a meal's detail record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub name: String,
    pub measure: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detail_json() -> &'static str {
        r#"{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350.",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
            "strIngredient1": "soy sauce",
            "strIngredient2": "water",
            "strIngredient3": " ",
            "strIngredient4": null,
            "strMeasure1": "3/4 cup",
            "strMeasure2": "1/2 cup",
            "strMeasure3": "",
            "strMeasure4": null
        }"#
    }

    #[test]
    fn test_decode_detail_record() {
        let meal: Meal = serde_json::from_str(sample_detail_json()).unwrap();
        assert_eq!(meal.id.as_deref(), Some("52772"));
        assert_eq!(meal.name, "Teriyaki Chicken Casserole");
        assert_eq!(meal.category.as_deref(), Some("Chicken"));
        assert_eq!(meal.area.as_deref(), Some("Japanese"));
        assert!(meal.thumbnail.as_deref().unwrap().starts_with("https://"));
    }

    #[test]
    fn test_ingredient_lines_skip_blanks() {
        let meal: Meal = serde_json::from_str(sample_detail_json()).unwrap();
        let lines = meal.ingredient_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "soy sauce");
        assert_eq!(lines[0].measure, "3/4 cup");
        assert_eq!(lines[1].name, "water");
    }

    #[test]
    fn test_decode_summary_record() {
        // filter.php only returns id, name and thumbnail
        let json = r#"{"idMeal": "52959", "strMeal": "Baked salmon", "strMealThumb": null}"#;
        let meal: Meal = serde_json::from_str(json).unwrap();
        assert_eq!(meal.key(), "52959");
        assert!(meal.category.is_none());
        assert!(meal.ingredient_lines().is_empty());
    }

    #[test]
    fn test_key_falls_back_to_name() {
        let json = r#"{"strMeal": "Mystery Stew"}"#;
        let meal: Meal = serde_json::from_str(json).unwrap();
        assert_eq!(meal.key(), "Mystery Stew");
    }

    #[test]
    fn test_empty_response_envelope() {
        let response: MealResponse = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(response.meals.is_none());
    }
}
