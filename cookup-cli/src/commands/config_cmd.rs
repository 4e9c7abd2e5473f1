use clap::{Args, Subcommand, ValueEnum};
use std::fs;

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        println!("api_base_url: {}", config.api_base_url.value);
                        println!("  source: {}", config.api_base_url.source);
                        println!();

                        println!(
                            "remote.base_url: {}",
                            config.remote.base_url.as_deref().unwrap_or("(not set)")
                        );
                        println!(
                            "remote.api_key: {}",
                            if config.remote.api_key.is_some() {
                                "(set)"
                            } else {
                                "(not set)"
                            }
                        );
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'cookup config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let default_config = r#"# cookup configuration

# Directory for local state (favorites file, session)
# data_dir: ~/.local/share/cookup

# Recipe API endpoint
# api_base_url: https://www.themealdb.com/api/json/v1/1

# Remote favorites document store (enables cross-device favorites)
# remote:
#   base_url: https://sync.example.com/v1
#   api_key: your-secret-key
"#;
                fs::write(&config_path, default_config)?;
                println!("Created config file: {}", config_path.display());
                Ok(())
            }
        }
    }
}
