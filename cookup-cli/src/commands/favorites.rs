//! Favorites management commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use futures::future;
use tokio::runtime::Runtime;

use cookup_core::{AuthState, FavoriteStore, FavoritesFile, Meal, MealService, RestRemote};

use super::meals::OutputFormat;
use crate::config::Config;
use crate::session::{Session, SessionError};

#[derive(Args)]
pub struct FavoritesCommand {
    #[command(subcommand)]
    pub command: FavoritesSubcommand,
}

#[derive(Subcommand)]
pub enum FavoritesSubcommand {
    /// List favorites with full details
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Print ids only, without fetching details
        #[arg(long)]
        ids_only: bool,
    },

    /// Add a recipe id to the favorites
    Add {
        /// Recipe id
        id: String,
    },

    /// Remove a recipe id from the favorites
    Remove {
        /// Recipe id
        id: String,
    },

    /// Toggle a recipe id
    Toggle {
        /// Recipe id
        id: String,
    },

    /// Reload favorites from the signed-in user's remote document
    Pull,
}

impl FavoritesCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = Runtime::new()?;
        rt.block_on(async {
            let store = build_store(config)?;
            match &self.command {
                FavoritesSubcommand::List { format, ids_only } => {
                    list(config, &store, format, *ids_only).await
                }
                FavoritesSubcommand::Add { id } => {
                    if store.is_favorite(id) {
                        println!("{} is already a favorite.", id);
                        return Ok(());
                    }
                    store.add(id);
                    sync_remote(&store).await;
                    println!("Added {} to favorites.", id);
                    Ok(())
                }
                FavoritesSubcommand::Remove { id } => {
                    if !store.is_favorite(id) {
                        println!("{} is not a favorite.", id);
                        return Ok(());
                    }
                    store.remove(id);
                    sync_remote(&store).await;
                    println!("Removed {} from favorites.", id);
                    Ok(())
                }
                FavoritesSubcommand::Toggle { id } => {
                    store.toggle(id);
                    sync_remote(&store).await;
                    if store.is_favorite(id) {
                        println!("Added {} to favorites.", id);
                    } else {
                        println!("Removed {} from favorites.", id);
                    }
                    Ok(())
                }
                FavoritesSubcommand::Pull => pull(config, &store).await,
            }
        })
    }
}

/// Wires the favorites core to the CLI config and session.
///
/// Without a remote endpoint the session is ignored: favorites stay local and
/// no sync is attempted.
pub(crate) fn build_store(config: &Config) -> Result<Arc<FavoriteStore>, SessionError> {
    let user = if config.remote.is_configured() {
        Session::new(&config.data_dir.value).current_user()?
    } else {
        None
    };
    let remote = RestRemote::new(
        config.remote.base_url.clone().unwrap_or_default(),
        config.remote.api_key.clone(),
    );
    let auth = AuthState::new(user);
    Ok(FavoriteStore::new(
        FavoritesFile::new(&config.data_dir.value),
        Arc::new(remote),
        auth.subscribe(),
    ))
}

// Remote failures never fail the command; the local mutation stands and the
// next push carries the full set anyway.
async fn sync_remote(store: &FavoriteStore) {
    if let Err(e) = store.push_remote().await {
        eprintln!("Warning: favorites saved locally, remote sync failed: {}", e);
    }
}

async fn list(
    config: &Config,
    store: &FavoriteStore,
    format: &OutputFormat,
    ids_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ids: Vec<String> = store.favorites().into_iter().collect();
    ids.sort_unstable();

    if ids.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }

    if ids_only {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ids)?),
            OutputFormat::Table => {
                for id in &ids {
                    println!("{}", id);
                }
            }
        }
        return Ok(());
    }

    // Hydrate ids in parallel; a failed or missing detail never hides the
    // rest of the list.
    let service = MealService::with_base_url(&config.api_base_url.value);
    let lookups = future::join_all(ids.iter().map(|id| service.lookup(id))).await;

    match format {
        OutputFormat::Json => {
            let meals: Vec<Meal> = lookups
                .into_iter()
                .filter_map(|result| result.ok().flatten())
                .collect();
            println!("{}", serde_json::to_string_pretty(&meals)?);
        }
        OutputFormat::Table => {
            for (id, result) in ids.iter().zip(lookups) {
                match result {
                    Ok(Some(meal)) => match &meal.category {
                        Some(category) => println!("{:<8} {} ({})", id, meal.name, category),
                        None => println!("{:<8} {}", id, meal.name),
                    },
                    Ok(None) => println!("{:<8} (no longer available)", id),
                    Err(e) => println!("{:<8} (details unavailable: {})", id, e),
                }
            }
        }
    }
    Ok(())
}

async fn pull(
    config: &Config,
    store: &FavoriteStore,
) -> Result<(), Box<dyn std::error::Error>> {
    if !config.remote.is_configured() {
        return Err("Remote not configured. Set remote.base_url in config.".into());
    }
    let session = Session::new(&config.data_dir.value);
    if session.current_user()?.is_none() {
        println!("Not signed in; favorites stay local.");
        return Ok(());
    }
    store.reload().await?;
    println!("Pulled {} favorites from remote.", store.favorites().len());
    Ok(())
}
