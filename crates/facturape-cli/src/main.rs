//! CLI application for Peruvian invoice field extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, enhance, extract, merchants, ruc};

/// Peruvian invoice OCR - Extract RUC, date, currency and total from OCR output
#[derive(Parser)]
#[command(name = "facturape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from a single OCR dump
    Extract(extract::ExtractArgs),

    /// Extract fields from multiple OCR dumps
    Batch(batch::BatchArgs),

    /// Validate RUC check digits
    Ruc(ruc::RucArgs),

    /// List the built-in merchant directory
    Merchants(merchants::MerchantsArgs),

    /// Enhance receipt photo contrast before OCR
    Enhance(enhance::EnhanceArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Ruc(args) => ruc::run(args).await,
        Commands::Merchants(args) => merchants::run(args).await,
        Commands::Enhance(args) => enhance::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
