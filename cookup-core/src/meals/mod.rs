//! Recipe lookup service.
//!
//! HTTP client for TheMealDB public API. Every endpoint returns a JSON
//! envelope whose `meals` field is null when there are no results; the client
//! normalizes that to an empty list. Multi-keyword search and multi-random
//! fetches fan out in parallel and deduplicate the combined results.

mod client;
mod error;

pub use client::{dedupe_meals, MealService, DEFAULT_BASE_URL};
pub use error::MealServiceError;
