use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::UnlatchConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value or section, e.g. `search.workers`
    Get { key: String },
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&str>) -> Result<()> {
    let config = UnlatchConfig::load(custom_config, None::<&()>)?;
    // Surface type errors here rather than at the next crack
    config.settings()?;

    match args.command {
        ConfigCommand::Show { json } => {
            let merged = config.get_full_config()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&merged)?);
            } else {
                let rendered =
                    toml::to_string_pretty(&merged).context("Failed to render configuration")?;
                print!("{rendered}");
            }
        }
        ConfigCommand::Get { key } => {
            let value = config
                .get_section(&key)
                .with_context(|| format!("Configuration key '{key}' not found"))?;
            match value {
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    println!("{}", serde_json::to_string_pretty(&value)?)
                }
                serde_json::Value::String(s) => println!("{s}"),
                other => println!("{other}"),
            }
        }
    }

    Ok(())
}
