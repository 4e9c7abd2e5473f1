//! Favorites reconciliation core.
//!
//! Bridges three copies of the favorites set: an in-memory observable copy,
//! a local durable file, and an optional per-user remote document, reconciled
//! on authentication-state transitions.
//!
//! # Reconciliation policy
//!
//! - Sign-in: the remote document wins wholesale when it carries a
//!   `favorites` list; an absent document keeps the local set as the seed.
//! - Sign-out: no mutation; local favorites are retained.
//! - Mutations: in-memory first, local write always, remote push only while
//!   signed in. Remote failures are logged and never surfaced to the caller.

mod local;
mod remote;
mod store;

pub use local::{FavoritesFile, LocalStoreError, FAVORITES_KEY};
pub use remote::{RemoteError, RemoteFavorites, RestRemote};
pub use store::FavoriteStore;
