use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod session;

use commands::{
    CategoryCommand, ConfigCommand, FavoritesCommand, IngredientCommand, IngredientsCommand,
    LoginCommand, LogoutCommand, RandomCommand, SearchCommand, ShowCommand, StatusCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "cookup")]
#[command(version)]
#[command(about = "Browse recipes and manage favorites from the terminal", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recipes by name
    Search(SearchCommand),

    /// List recipes in a category
    Category(CategoryCommand),

    /// List recipes using an ingredient
    Ingredient(IngredientCommand),

    /// Fetch random recipes
    Random(RandomCommand),

    /// Show full details for a recipe id
    Show(ShowCommand),

    /// List the ingredient catalog
    Ingredients(IngredientsCommand),

    /// Manage the favorites list
    Favorites(FavoritesCommand),

    /// Sign in as a user id (enables remote favorites sync)
    Login(LoginCommand),

    /// Sign out, keeping local favorites
    Logout(LogoutCommand),

    /// Show session and configuration status
    Status(StatusCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;

    match &cli.command {
        Commands::Search(cmd) => cmd.run(&config),
        Commands::Category(cmd) => cmd.run(&config),
        Commands::Ingredient(cmd) => cmd.run(&config),
        Commands::Random(cmd) => cmd.run(&config),
        Commands::Show(cmd) => cmd.run(&config),
        Commands::Ingredients(cmd) => cmd.run(&config),
        Commands::Favorites(cmd) => cmd.run(&config),
        Commands::Login(cmd) => cmd.run(&config),
        Commands::Logout(cmd) => cmd.run(&config),
        Commands::Status(cmd) => cmd.run(&config),
        Commands::Config(cmd) => cmd.run(&config),
    }
}
