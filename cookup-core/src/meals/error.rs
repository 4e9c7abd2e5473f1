//! Meal service error types.

/// Errors that can occur when talking to the recipe API.
#[derive(Debug)]
pub enum MealServiceError {
    /// The server answered with a non-success status
    RequestFailed(u16),
    /// The request could not be sent or the response body not read
    Transport(reqwest::Error),
    /// The response body was not the expected JSON shape
    Decode(serde_json::Error),
    /// The server answered successfully but with no record
    EmptyResponse,
}

impl std::fmt::Display for MealServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealServiceError::RequestFailed(status) => {
                write!(f, "Recipe API returned status {}", status)
            }
            MealServiceError::Transport(e) => write!(f, "Request failed: {}", e),
            MealServiceError::Decode(e) => write!(f, "Failed to decode recipe response: {}", e),
            MealServiceError::EmptyResponse => write!(f, "Recipe API returned no record"),
        }
    }
}

impl std::error::Error for MealServiceError {}

impl From<reqwest::Error> for MealServiceError {
    fn from(e: reqwest::Error) -> Self {
        MealServiceError::Transport(e)
    }
}

impl From<serde_json::Error> for MealServiceError {
    fn from(e: serde_json::Error) -> Self {
        MealServiceError::Decode(e)
    }
}
