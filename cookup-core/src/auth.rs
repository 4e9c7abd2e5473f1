//! Authentication-state plumbing.
//!
//! The favorites core does not implement sign-in itself; it observes an
//! external authentication provider through a watch channel carrying the
//! current user id (`None` = signed out). [`AuthState`] is the publisher
//! side, used by whatever actually performs authentication (the CLI session
//! layer, tests).

use tokio::sync::watch;

/// Subscribable stream of "current user changed" events.
///
/// The receiver always carries the latest value, so a new subscriber sees the
/// current state immediately.
pub type AuthWatcher = watch::Receiver<Option<String>>;

/// Publisher side of the authentication state.
#[derive(Debug)]
pub struct AuthState {
    tx: watch::Sender<Option<String>>,
}

impl AuthState {
    pub fn new(initial: Option<String>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Subscribes to user-change events.
    pub fn subscribe(&self) -> AuthWatcher {
        self.tx.subscribe()
    }

    /// The currently signed-in user id, if any.
    pub fn current_user(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// Publishes a signed-in transition.
    pub fn sign_in(&self, user_id: impl Into<String>) {
        self.tx.send_replace(Some(user_id.into()));
    }

    /// Publishes a signed-out transition.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_sees_current_state() {
        let auth = AuthState::new(Some("u1".to_string()));
        let rx = auth.subscribe();
        assert_eq!(rx.borrow().as_deref(), Some("u1"));
    }

    #[test]
    fn test_transitions_are_published() {
        let auth = AuthState::default();
        let mut rx = auth.subscribe();
        assert!(auth.current_user().is_none());

        auth.sign_in("u1");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_deref(), Some("u1"));

        auth.sign_out();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }
}
