//! The favorites store.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use super::local::FavoritesFile;
use super::remote::{RemoteError, RemoteFavorites};
use crate::auth::AuthWatcher;

/// Authoritative holder of the favorite recipe identifiers.
///
/// Owns three copies of the set and keeps them consistent:
/// - the in-memory observable copy, published through a watch channel
///   synchronously on every change;
/// - the local durable file, rewritten in full on every change;
/// - the signed-in user's remote document, mirrored fire-and-forget.
///
/// Construct once with [`FavoriteStore::new`] and share the returned `Arc`;
/// there is no hidden global. Consumers that need change notifications call
/// [`FavoriteStore::subscribe`].
///
/// All membership reads and writes go through one internal lock, so
/// concurrent mutations and auth-transition handling cannot lose updates.
pub struct FavoriteStore {
    ids: Mutex<HashSet<String>>,
    changes: watch::Sender<HashSet<String>>,
    local: FavoritesFile,
    remote: Arc<dyn RemoteFavorites>,
    auth: AuthWatcher,
    runtime: Handle,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl FavoriteStore {
    /// Builds the store and starts its auth-listener task.
    ///
    /// Seeds the set from the local file; an absent or unreadable file means
    /// "no local favorites" and never fails construction. The listener treats
    /// the provider's current value as its first event, so constructing the
    /// store while already signed in triggers an initial reconciliation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        local: FavoritesFile,
        remote: Arc<dyn RemoteFavorites>,
        auth: AuthWatcher,
    ) -> Arc<Self> {
        let ids: HashSet<String> = match local.load() {
            Ok(Some(list)) => list.into_iter().filter(|id| !id.is_empty()).collect(),
            Ok(None) => HashSet::new(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable local favorites");
                HashSet::new()
            }
        };
        let (changes, _) = watch::channel(ids.clone());

        let store = Arc::new(Self {
            ids: Mutex::new(ids),
            changes,
            local,
            remote,
            auth: auth.clone(),
            runtime: Handle::current(),
            listener: Mutex::new(None),
        });

        let task = store
            .runtime
            .spawn(Self::listen(Arc::downgrade(&store), auth));
        *store.listener.lock().unwrap() = Some(task);
        store
    }

    /// Pure membership query.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.lock().unwrap().contains(id)
    }

    /// Snapshot of the current set.
    pub fn favorites(&self) -> HashSet<String> {
        self.ids.lock().unwrap().clone()
    }

    /// Subscribes to change notifications. Every change delivers the full new
    /// set; the receiver already carries the current value at subscription
    /// time.
    pub fn subscribe(&self) -> watch::Receiver<HashSet<String>> {
        self.changes.subscribe()
    }

    /// Flips membership of `id`, persists locally and mirrors remotely.
    pub fn toggle(&self, id: &str) {
        if id.is_empty() {
            return;
        }
        self.mutate(|ids| {
            if !ids.remove(id) {
                ids.insert(id.to_owned());
            }
            true
        });
    }

    /// Inserts `id`. A no-op when already present: no persistence, no sync.
    pub fn add(&self, id: &str) {
        if id.is_empty() {
            return;
        }
        self.mutate(|ids| ids.insert(id.to_owned()));
    }

    /// Removes `id`. A no-op when absent: no persistence, no sync.
    pub fn remove(&self, id: &str) {
        self.mutate(|ids| ids.remove(id));
    }

    /// Pushes the current set to the signed-in user's remote document.
    ///
    /// Returns `Ok(false)` when signed out. Short-lived callers (the CLI) use
    /// this instead of relying on a fire-and-forget push outliving them; it
    /// also serves as the manual retry for a dropped sync.
    pub async fn push_remote(&self) -> Result<bool, RemoteError> {
        let Some(user_id) = self.current_user() else {
            return Ok(false);
        };
        let list = sorted(self.favorites());
        self.remote.save(&user_id, &list).await?;
        Ok(true)
    }

    /// Re-runs the sign-in reconciliation for the current user, if any.
    ///
    /// This is the explicit reload path; unlike the listener it reports the
    /// fetch error to the caller.
    pub async fn reload(&self) -> Result<(), RemoteError> {
        let Some(user_id) = self.current_user() else {
            return Ok(());
        };
        let fetched = self.remote.load(&user_id).await?;
        self.apply_remote(fetched);
        Ok(())
    }

    /// Cancels the auth-listener subscription. Also runs on drop, so the
    /// subscription can never outlive the store.
    pub fn shutdown(&self) {
        if let Some(task) = self.listener.lock().unwrap().take() {
            task.abort();
        }
    }

    fn current_user(&self) -> Option<String> {
        self.auth.borrow().clone()
    }

    // The in-memory update, the synchronous watch publish and the local write
    // all happen under the lock: concurrent mutations persist in application
    // order and a stale snapshot can never overwrite a newer file. Only the
    // remote push leaves the lock.
    fn mutate(&self, apply: impl FnOnce(&mut HashSet<String>) -> bool) {
        let snapshot = {
            let mut ids = self.ids.lock().unwrap();
            if !apply(&mut ids) {
                return;
            }
            let snapshot = ids.clone();
            self.changes.send_replace(snapshot.clone());
            self.persist_local(&snapshot);
            snapshot
        };
        self.spawn_push(snapshot);
    }

    fn persist_local(&self, ids: &HashSet<String>) {
        if let Err(e) = self.local.save(ids) {
            warn!(error = %e, "failed to persist favorites locally");
        }
    }

    // Fire-and-forget: failures are logged, never surfaced to the mutating
    // caller, and not retried until the next push.
    fn spawn_push(&self, snapshot: HashSet<String>) {
        let Some(user_id) = self.current_user() else {
            return;
        };
        let remote = Arc::clone(&self.remote);
        self.runtime.spawn(async move {
            let list = sorted(snapshot);
            if let Err(e) = remote.save(&user_id, &list).await {
                warn!(user_id = %user_id, error = %e, "failed to sync favorites to remote");
            }
        });
    }

    // Remote wins wholesale when the document carries a favorites list; an
    // absent document (or missing field) keeps the local set and persists it
    // as the seed for the first remote write.
    fn apply_remote(&self, fetched: Option<Vec<String>>) {
        let mut ids = self.ids.lock().unwrap();
        match fetched {
            Some(list) => {
                *ids = list.into_iter().filter(|id| !id.is_empty()).collect();
                let snapshot = ids.clone();
                self.changes.send_replace(snapshot.clone());
                self.persist_local(&snapshot);
            }
            None => self.persist_local(&ids),
        }
    }

    async fn reconcile(&self, user_id: &str) {
        match self.remote.load(user_id).await {
            Ok(fetched) => self.apply_remote(fetched),
            Err(e) => {
                // Non-fatal: in-memory and local state stay as they were, no
                // automatic retry.
                warn!(user_id = %user_id, error = %e, "failed to load favorites from remote");
            }
        }
    }

    // Holds only a weak reference between events so dropping the last
    // external Arc tears the task down via Drop/abort.
    async fn listen(store: Weak<Self>, mut auth: AuthWatcher) {
        loop {
            let user = auth.borrow_and_update().clone();
            if let Some(user_id) = user {
                let Some(store) = store.upgrade() else { return };
                store.reconcile(&user_id).await;
            }
            // Signed out: keep in-memory and local state untouched.
            if auth.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Drop for FavoriteStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for FavoriteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoriteStore")
            .field("ids", &self.ids)
            .field("local", &self.local)
            .finish_non_exhaustive()
    }
}

fn sorted(ids: HashSet<String>) -> Vec<String> {
    let mut list: Vec<String> = ids.into_iter().collect();
    list.sort_unstable();
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthState;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::timeout;

    #[derive(Default)]
    struct MockRemote {
        docs: Mutex<HashMap<String, Vec<String>>>,
        fail_loads: AtomicBool,
        load_calls: AtomicUsize,
        save_calls: AtomicUsize,
    }

    impl MockRemote {
        fn with_document(user_id: &str, favorites: &[&str]) -> Self {
            let mock = Self::default();
            mock.docs.lock().unwrap().insert(
                user_id.to_string(),
                favorites.iter().map(|s| s.to_string()).collect(),
            );
            mock
        }

        fn saved(&self, user_id: &str) -> Option<Vec<String>> {
            self.docs.lock().unwrap().get(user_id).cloned()
        }
    }

    #[async_trait::async_trait]
    impl RemoteFavorites for MockRemote {
        async fn load(&self, user_id: &str) -> Result<Option<Vec<String>>, RemoteError> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(RemoteError::Transport("connection refused".to_string()));
            }
            Ok(self.docs.lock().unwrap().get(user_id).cloned())
        }

        async fn save(&self, user_id: &str, favorites: &[String]) -> Result<(), RemoteError> {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            self.docs
                .lock()
                .unwrap()
                .insert(user_id.to_string(), favorites.to_vec());
            Ok(())
        }
    }

    fn set_of(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    async fn wait_until(condition: impl Fn() -> bool) {
        timeout(Duration::from_secs(2), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn add_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::default());
        let auth = AuthState::new(Some("u1".to_string()));
        let store = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            remote.clone(),
            auth.subscribe(),
        );

        store.add("52772");
        store.add("52772");
        assert!(store.is_favorite("52772"));
        assert_eq!(store.favorites().len(), 1);

        // Only the first add dispatches a push; the second is a pure no-op.
        wait_until(|| remote.save_calls.load(Ordering::SeqCst) == 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(remote.save_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn remove_of_absent_id_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::default());
        let store = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            remote.clone(),
            AuthState::default().subscribe(),
        );

        store.remove("52772");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(remote.save_calls.load(Ordering::SeqCst), 0);
        // No mutation happened, so nothing was persisted either.
        assert!(FavoritesFile::new(dir.path()).load().unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn toggle_is_involutive() {
        let dir = TempDir::new().unwrap();
        let store = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            Arc::new(MockRemote::default()),
            AuthState::default().subscribe(),
        );

        assert!(!store.is_favorite("52772"));
        store.toggle("52772");
        assert!(store.is_favorite("52772"));
        store.toggle("52772");
        assert!(!store.is_favorite("52772"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn local_round_trip_across_store_instances() {
        let dir = TempDir::new().unwrap();
        let auth = AuthState::default();
        let first = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            Arc::new(MockRemote::default()),
            auth.subscribe(),
        );
        first.toggle("X");
        drop(first);

        let second = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            Arc::new(MockRemote::default()),
            auth.subscribe(),
        );
        assert!(second.is_favorite("X"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sign_in_replaces_local_set() {
        let dir = TempDir::new().unwrap();
        let local = FavoritesFile::new(dir.path());
        local.save(&set_of(&["A", "B"])).unwrap();

        let remote = Arc::new(MockRemote::with_document("u1", &["B", "C"]));
        let auth = AuthState::default();
        let store = FavoriteStore::new(local.clone(), remote, auth.subscribe());
        assert_eq!(store.favorites(), set_of(&["A", "B"]));

        let mut rx = store.subscribe();
        auth.sign_in("u1");
        timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("no reconciliation")
            .unwrap();

        // Remote replaces, not a union: the local-only "A" is discarded.
        assert_eq!(store.favorites(), set_of(&["B", "C"]));
        let persisted: HashSet<String> = local.load().unwrap().unwrap().into_iter().collect();
        assert_eq!(persisted, set_of(&["B", "C"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sign_in_without_remote_document_keeps_local_set() {
        let dir = TempDir::new().unwrap();
        let local = FavoritesFile::new(dir.path());
        local.save(&set_of(&["A"])).unwrap();

        let remote = Arc::new(MockRemote::default());
        let auth = AuthState::default();
        let store = FavoriteStore::new(local.clone(), remote.clone(), auth.subscribe());

        auth.sign_in("u1");
        wait_until(|| remote.load_calls.load(Ordering::SeqCst) >= 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.favorites(), set_of(&["A"]));
        // Local state is persisted as the seed, but nothing is written
        // remotely until the next mutation.
        assert_eq!(local.load().unwrap().unwrap(), vec!["A".to_string()]);
        assert_eq!(remote.save_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_toggles_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let store = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            Arc::new(MockRemote::default()),
            AuthState::default().subscribe(),
        );

        let a = Arc::clone(&store);
        let b = Arc::clone(&store);
        let t1 = std::thread::spawn(move || a.toggle("A"));
        let t2 = std::thread::spawn(move || b.toggle("B"));
        t1.join().unwrap();
        t2.join().unwrap();

        assert_eq!(store.favorites(), set_of(&["A", "B"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sign_out_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::with_document("u1", &["A"]));
        let auth = AuthState::new(Some("u1".to_string()));
        let store = FavoriteStore::new(FavoritesFile::new(dir.path()), remote, auth.subscribe());

        wait_until(|| store.is_favorite("A")).await;

        auth.sign_out();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.favorites(), set_of(&["A"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn remote_fetch_failure_leaves_state_unchanged() {
        let dir = TempDir::new().unwrap();
        let local = FavoritesFile::new(dir.path());
        local.save(&set_of(&["A"])).unwrap();

        let remote = Arc::new(MockRemote::default());
        remote.fail_loads.store(true, Ordering::SeqCst);
        let auth = AuthState::default();
        let store = FavoriteStore::new(local.clone(), remote.clone(), auth.subscribe());

        auth.sign_in("u1");
        wait_until(|| remote.load_calls.load(Ordering::SeqCst) >= 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.favorites(), set_of(&["A"]));
        assert_eq!(local.load().unwrap().unwrap(), vec!["A".to_string()]);

        // The explicit reload path surfaces the same failure to the caller.
        assert!(store.reload().await.is_err());
        assert_eq!(store.favorites(), set_of(&["A"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mutations_push_to_remote_while_signed_in() {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::default());
        let auth = AuthState::new(Some("u1".to_string()));
        let store = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            remote.clone(),
            auth.subscribe(),
        );

        store.add("52772");
        wait_until(|| remote.saved("u1") == Some(vec!["52772".to_string()])).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn explicit_push_reports_signed_out() {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::default());
        let store = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            remote.clone(),
            AuthState::default().subscribe(),
        );

        store.add("52772");
        assert!(!store.push_remote().await.unwrap());
        assert_eq!(remote.save_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn subscribers_observe_changes_synchronously() {
        let dir = TempDir::new().unwrap();
        let store = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            Arc::new(MockRemote::default()),
            AuthState::default().subscribe(),
        );

        let mut rx = store.subscribe();
        store.add("52772");
        // No await between the mutation and the observation.
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().contains("52772"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FavoriteStore::new(
            FavoritesFile::new(dir.path()),
            Arc::new(MockRemote::default()),
            AuthState::default().subscribe(),
        );

        store.add("");
        store.toggle("");
        assert!(store.favorites().is_empty());
        assert!(FavoritesFile::new(dir.path()).load().unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreadable_local_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let local = FavoritesFile::new(dir.path());
        std::fs::write(local.path(), "not json").unwrap();

        let store = FavoriteStore::new(
            local.clone(),
            Arc::new(MockRemote::default()),
            AuthState::default().subscribe(),
        );
        assert!(store.favorites().is_empty());

        // The store is still fully usable afterwards.
        store.toggle("52772");
        assert_eq!(local.load().unwrap().unwrap(), vec!["52772".to_string()]);
    }
}
