//! HTTP client for TheMealDB.

use std::collections::HashSet;

use futures::future;

use super::error::MealServiceError;
use crate::models::{IngredientInfo, IngredientResponse, Meal, MealResponse};

/// Public TheMealDB endpoint (free tier, API key `1` baked into the path).
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Client for the recipe lookup service.
#[derive(Debug, Clone)]
pub struct MealService {
    http: reqwest::Client,
    base_url: String,
}

impl MealService {
    /// Creates a client against the public TheMealDB endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom endpoint (mirrors, paid tiers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Searches meals by name (`search.php?s=`).
    pub async fn search(&self, query: &str) -> Result<Vec<Meal>, MealServiceError> {
        self.get_meals("search.php", &[("s", query)]).await
    }

    /// Searches several keywords in parallel and returns the deduplicated
    /// union of the results.
    pub async fn search_keywords(&self, keywords: &[String]) -> Result<Vec<Meal>, MealServiceError> {
        let results = future::try_join_all(keywords.iter().map(|kw| self.search(kw))).await?;
        Ok(dedupe_meals(results.into_iter().flatten()))
    }

    /// Lists meals in a category (`filter.php?c=`). Summary records only.
    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<Meal>, MealServiceError> {
        self.get_meals("filter.php", &[("c", category)]).await
    }

    /// Lists meals using an ingredient (`filter.php?i=`). Summary records only.
    pub async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Vec<Meal>, MealServiceError> {
        self.get_meals("filter.php", &[("i", ingredient)]).await
    }

    /// Fetches a single random meal (`random.php`).
    pub async fn random(&self) -> Result<Meal, MealServiceError> {
        self.get_meals("random.php", &[])
            .await?
            .into_iter()
            .next()
            .ok_or(MealServiceError::EmptyResponse)
    }

    /// Fetches `count` random meals in parallel, deduplicated. The result may
    /// be shorter than `count` when the API repeats itself.
    pub async fn random_many(&self, count: usize) -> Result<Vec<Meal>, MealServiceError> {
        let results = future::try_join_all((0..count).map(|_| self.random())).await?;
        Ok(dedupe_meals(results))
    }

    /// Looks up the full record for a meal id (`lookup.php?i=`).
    pub async fn lookup(&self, id: &str) -> Result<Option<Meal>, MealServiceError> {
        Ok(self
            .get_meals("lookup.php", &[("i", id)])
            .await?
            .into_iter()
            .next())
    }

    /// Lists the ingredient catalog (`list.php?i=list`).
    pub async fn list_ingredients(&self) -> Result<Vec<IngredientInfo>, MealServiceError> {
        let body = self.get_body("list.php", &[("i", "list")]).await?;
        let decoded: IngredientResponse = serde_json::from_str(&body)?;
        Ok(decoded.meals.unwrap_or_default())
    }

    async fn get_meals(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Meal>, MealServiceError> {
        let body = self.get_body(endpoint, query).await?;
        let decoded: MealResponse = serde_json::from_str(&body)?;
        Ok(decoded.meals.unwrap_or_default())
    }

    // Body is read as text first so that transport and decode failures stay
    // distinguishable in the error taxonomy.
    async fn get_body(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<String, MealServiceError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.http.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(MealServiceError::RequestFailed(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }
}

impl Default for MealService {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes duplicate meals, keeping the first occurrence of each key.
pub fn dedupe_meals(meals: impl IntoIterator<Item = Meal>) -> Vec<Meal> {
    let mut seen = HashSet::new();
    meals
        .into_iter()
        .filter(|meal| seen.insert(meal.key().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(id: &str, name: &str) -> Meal {
        serde_json::from_str(&format!(
            r#"{{"idMeal": "{}", "strMeal": "{}"}}"#,
            id, name
        ))
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = MealService::with_base_url("https://example.com/api/");
        assert_eq!(service.base_url(), "https://example.com/api");
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let meals = vec![
            meal("1", "Arrabiata"),
            meal("2", "Carbonara"),
            meal("1", "Arrabiata again"),
        ];
        let deduped = dedupe_meals(meals);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "Arrabiata");
        assert_eq!(deduped[1].name, "Carbonara");
    }

    #[test]
    fn test_dedupe_falls_back_to_name_without_id() {
        let a: Meal = serde_json::from_str(r#"{"strMeal": "Mystery"}"#).unwrap();
        let b: Meal = serde_json::from_str(r#"{"strMeal": "Mystery"}"#).unwrap();
        assert_eq!(dedupe_meals(vec![a, b]).len(), 1);
    }
}
