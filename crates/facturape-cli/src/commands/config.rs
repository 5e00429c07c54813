//! Config command - inspect and edit the JSON configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use facturape_core::FacturaConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Where to write it (default: the active config path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, e.g. "extraction.similarity_threshold"
    Get { key: String },

    /// Change one value and save the file
    Set { key: String, value: String },

    /// Print the active config path
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = active_path(config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                eprintln!("{} {} not found, using defaults", style("ℹ").blue(), path.display());
            }
            println!("{}", serde_json::to_string_pretty(&load_or_default(&path)?)?);
        }
        ConfigCommand::Init { output, force } => {
            init(&output.unwrap_or(path), force)?;
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(load_or_default(&path)?)?;
            let value = json
                .pointer(&pointer(&key))
                .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
            println!("{}", value);
        }
        ConfigCommand::Set { key, value } => {
            let config = set(load_or_default(&path)?, &key, &value)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&path)?;
            println!("{} {} updated in {}", style("✓").green(), key, path.display());
        }
        ConfigCommand::Path => {
            let status = if path.exists() {
                style("exists").green()
            } else {
                style("not created").yellow()
            };
            println!("{} ({})", path.display(), status);
        }
    }

    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("facturape")
        .join("config.json")
}

fn active_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

fn load_or_default(path: &Path) -> anyhow::Result<FacturaConfig> {
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(FacturaConfig::from_file(path)?)
    } else {
        Ok(FacturaConfig::default())
    }
}

/// Load configuration: an explicit path must exist; the default file is optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FacturaConfig> {
    match config_path {
        Some(path) => Ok(FacturaConfig::from_file(Path::new(path))?),
        None => load_or_default(&default_config_path()),
    }
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists, pass --force to replace it", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    FacturaConfig::default().save(path)?;
    println!("{} Wrote default configuration to {}", style("✓").green(), path.display());
    Ok(())
}

/// Dotted key to JSON pointer: "a.b" becomes "/a/b".
fn pointer(key: &str) -> String {
    key.split('.').map(|part| format!("/{}", part)).collect()
}

/// Apply one dotted-key update, keeping the field's JSON type and the
/// config's validation rules.
fn set(config: FacturaConfig, key: &str, raw: &str) -> anyhow::Result<FacturaConfig> {
    let mut json = serde_json::to_value(config)?;
    let slot = json
        .pointer_mut(&pointer(key))
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;

    if slot.is_object() {
        anyhow::bail!("{} is a section, not a value", key);
    }
    *slot = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let updated: FacturaConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    updated.validate()?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer() {
        assert_eq!(pointer("extraction.header_lines"), "/extraction/header_lines");
    }

    #[test]
    fn test_set_updates_value() {
        let config = set(FacturaConfig::default(), "extraction.header_lines", "12").unwrap();
        assert_eq!(config.extraction.header_lines, 12);
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_values() {
        assert!(set(FacturaConfig::default(), "extraction.nope", "1").is_err());
        assert!(set(FacturaConfig::default(), "extraction", "1").is_err());
        assert!(set(FacturaConfig::default(), "extraction.header_lines", "many").is_err());
        assert!(set(FacturaConfig::default(), "extraction.similarity_threshold", "1.5").is_err());
    }
}
