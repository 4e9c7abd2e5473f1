//! File-backed sign-in session.
//!
//! Stands in for the external authentication provider: the signed-in user id
//! is persisted under the data directory and fed into the auth watch channel
//! at startup. Signing out removes the file and leaves local favorites
//! untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    user_id: String,
}

/// Handle to the on-disk session record.
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("session.json"),
        }
    }

    /// The signed-in user id, or `None` when signed out.
    pub fn current_user(&self) -> Result<Option<String>, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Io(e)),
        };
        let session: SessionFile = serde_json::from_str(&contents)?;
        Ok(Some(session.user_id))
    }

    /// Records `user_id` as the signed-in user.
    pub fn sign_in(&self, user_id: &str) -> Result<(), SessionError> {
        if user_id.is_empty() {
            return Err(SessionError::EmptyUserId);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string(&SessionFile {
            user_id: user_id.to_string(),
        })?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    /// Removes the session record. A no-op when already signed out.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }
}

#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    EmptyUserId,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "Failed to access session file: {}", e),
            SessionError::Parse(e) => write!(f, "Session file is corrupt: {}", e),
            SessionError::EmptyUserId => write!(f, "User id cannot be empty"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        SessionError::Io(e)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_signed_out_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::new(temp_dir.path());
        assert!(session.current_user().unwrap().is_none());
    }

    #[test]
    fn test_sign_in_and_out() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::new(temp_dir.path());

        session.sign_in("u1").unwrap();
        assert_eq!(session.current_user().unwrap().as_deref(), Some("u1"));

        session.sign_out().unwrap();
        assert!(session.current_user().unwrap().is_none());
        // Signing out twice is fine.
        session.sign_out().unwrap();
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::new(temp_dir.path());
        assert!(matches!(
            session.sign_in(""),
            Err(SessionError::EmptyUserId)
        ));
    }
}
