use dialoguer::{Input, Select};
use rust_decimal::Decimal;
use tracing::info;

use lbo_core::{AssumptionOverrides, Assumptions};

/// Ask for base case or custom levers, returning the assumptions to run.
///
/// Custom mode prompts for purchase price, debt share, exit multiple and
/// revenue growth, each defaulting to the value already loaded.
pub fn prompt_assumptions(base: Assumptions) -> Result<Assumptions, Box<dyn std::error::Error>> {
    let mode = Select::new()
        .with_prompt("Run base case or custom?")
        .items(&["Base case", "Custom"])
        .default(0)
        .interact()?;

    if mode == 0 {
        eprintln!("\nRunning base case...\n");
        return Ok(base);
    }

    let overrides = AssumptionOverrides {
        purchase_price: Some(ask("Purchase Price ($)", base.purchase_price)?),
        debt_pct: Some(ask("Debt % (0.0-1.0)", base.debt_pct)?),
        exit_multiple: Some(ask("Exit Multiple", base.exit_multiple)?),
        revenue_growth: Some(ask("Revenue Growth % (0.0-1.0)", base.revenue_growth)?),
    };
    info!(?overrides, "custom assumptions entered");
    eprintln!("\nCustom assumptions loaded.\n");

    Ok(base.with_overrides(&overrides))
}

fn ask(prompt: &str, default: Decimal) -> Result<Decimal, Box<dyn std::error::Error>> {
    let value = Input::<Decimal>::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()?;
    Ok(value)
}
