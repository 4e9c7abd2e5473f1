//! Remote per-user favorites document.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Errors talking to the remote document store.
#[derive(Debug)]
pub enum RemoteError {
    /// The request could not be sent or the response not read
    Transport(String),
    /// The server answered with a non-success status
    Status(u16),
    /// The document body was not the expected shape
    Decode(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Transport(e) => write!(f, "Remote request failed: {}", e),
            RemoteError::Status(status) => write!(f, "Remote returned status {}", status),
            RemoteError::Decode(e) => write!(f, "Failed to decode remote document: {}", e),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Per-user remote favorites document.
///
/// `load` returns `Ok(None)` both when the document does not exist and when
/// it exists without a `favorites` field; the store treats the two
/// identically. `save` uses merge semantics: only the `favorites` field is
/// replaced, sibling fields in the document are preserved.
#[async_trait]
pub trait RemoteFavorites: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Option<Vec<String>>, RemoteError>;
    async fn save(&self, user_id: &str, favorites: &[String]) -> Result<(), RemoteError>;
}

#[derive(Debug, Deserialize)]
struct UserDocument {
    #[serde(default)]
    favorites: Option<Vec<String>>,
}

/// REST implementation against a per-user document endpoint.
///
/// Documents live at `{base_url}/users/{user_id}`: `GET` reads the document
/// (404 = not created yet), `PATCH` merge-writes the `favorites` field.
#[derive(Debug, Clone)]
pub struct RestRemote {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestRemote {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn document_url(&self, user_id: &str) -> String {
        format!("{}/users/{}", self.base_url, user_id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }
}

#[async_trait]
impl RemoteFavorites for RestRemote {
    async fn load(&self, user_id: &str) -> Result<Option<Vec<String>>, RemoteError> {
        let response = self
            .authorize(self.http.get(self.document_url(user_id)))
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status().as_u16()));
        }

        let document: UserDocument = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(document.favorites)
    }

    async fn save(&self, user_id: &str, favorites: &[String]) -> Result<(), RemoteError> {
        let response = self
            .authorize(self.http.patch(self.document_url(user_id)))
            .json(&json!({ "favorites": favorites }))
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url() {
        let remote = RestRemote::new("https://example.com/api/", None);
        assert_eq!(
            remote.document_url("u1"),
            "https://example.com/api/users/u1"
        );
    }

    #[test]
    fn test_document_without_favorites_field() {
        let document: UserDocument =
            serde_json::from_str(r#"{"display_name": "Someone"}"#).unwrap();
        assert!(document.favorites.is_none());
    }

    #[test]
    fn test_document_with_favorites_field() {
        let document: UserDocument =
            serde_json::from_str(r#"{"favorites": ["52772"], "display_name": "Someone"}"#)
                .unwrap();
        assert_eq!(document.favorites.unwrap(), vec!["52772".to_string()]);
    }
}
