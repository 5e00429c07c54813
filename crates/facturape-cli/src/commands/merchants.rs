//! Merchants command - list the built-in merchant directory.

use clap::Args;
use console::style;
use serde_json::json;

use facturape_core::MerchantDirectory;

/// Arguments for the merchants command.
#[derive(Args)]
pub struct MerchantsArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: MerchantsArgs) -> anyhow::Result<()> {
    let directory = MerchantDirectory::seed();

    if args.json {
        let entries: Vec<_> = directory
            .entries()
            .iter()
            .map(|m| json!({ "name": m.name, "ruc": m.ruc }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", style("Known merchants:").bold());
    println!();
    for merchant in directory.entries() {
        println!("  {:<16} {}", merchant.name, style(&merchant.ruc).cyan());
    }
    println!();
    println!("{} merchants", directory.len());

    Ok(())
}
