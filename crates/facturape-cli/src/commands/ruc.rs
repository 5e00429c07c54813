//! RUC command - validate SUNAT check digits.

use clap::Args;
use console::style;

use facturape_core::validate_ruc;

/// Arguments for the ruc command.
#[derive(Args)]
pub struct RucArgs {
    /// RUC numbers to validate
    #[arg(required = true)]
    values: Vec<String>,
}

pub async fn run(args: RucArgs) -> anyhow::Result<()> {
    let mut invalid = 0;

    for value in &args.values {
        let value = value.trim();
        if validate_ruc(value) {
            println!("{} {} valid", style("✓").green(), value);
        } else {
            invalid += 1;
            println!("{} {} invalid", style("✗").red(), value);
        }
    }

    if invalid > 0 {
        anyhow::bail!("{} of {} RUC numbers failed validation", invalid, args.values.len());
    }

    Ok(())
}
