//! Session commands.
//!
//! The CLI does not talk to an identity provider itself; it records the user
//! id locally and feeds it into the favorites store's auth stream at startup.

use clap::Args;
use tokio::runtime::Runtime;

use cookup_core::FavoritesFile;

use super::favorites::build_store;
use crate::config::Config;
use crate::session::Session;

#[derive(Args)]
pub struct LoginCommand {
    /// User id owning the remote favorites document
    pub user_id: String,
}

impl LoginCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        if !config.remote.is_configured() {
            return Err(
                "Remote not configured. Set remote.base_url in config (or COOKUP_REMOTE_URL)."
                    .into(),
            );
        }
        Session::new(&config.data_dir.value).sign_in(&self.user_id)?;

        // Run the sign-in reconciliation right away so the user sees the
        // merged state; a remote failure still leaves them signed in.
        let rt = Runtime::new()?;
        rt.block_on(async {
            let store = build_store(config)?;
            match store.reload().await {
                Ok(()) => println!(
                    "Signed in as {}. {} favorites after sync.",
                    self.user_id,
                    store.favorites().len()
                ),
                Err(e) => println!(
                    "Signed in as {}. Remote favorites unavailable: {}",
                    self.user_id, e
                ),
            }
            Ok(())
        })
    }
}

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        Session::new(&config.data_dir.value).sign_out()?;
        // Local favorites are deliberately kept on sign-out.
        println!("Signed out. Local favorites kept.");
        Ok(())
    }
}

#[derive(Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match Session::new(&config.data_dir.value).current_user()? {
            Some(user_id) => println!("Signed in as {}", user_id),
            None => println!("Signed out"),
        }
        println!(
            "Remote: {}",
            config.remote.base_url.as_deref().unwrap_or("(not configured)")
        );
        let favorites = FavoritesFile::new(&config.data_dir.value)
            .load()?
            .unwrap_or_default();
        println!("Local favorites: {}", favorites.len());
        Ok(())
    }
}
