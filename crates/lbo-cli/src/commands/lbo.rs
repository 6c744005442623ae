use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use lbo_core::lbo::model;
use lbo_core::lbo::sensitivity::{ExitMultipleRange, DEFAULT_EXIT_MULTIPLES};
use lbo_core::{AssumptionOverrides, Assumptions};

use crate::commands::prompt;
use crate::input;

/// Where the deal assumptions come from, plus the overridable deal levers
#[derive(Args)]
pub struct AssumptionArgs {
    /// Path to a JSON or YAML assumptions file (missing fields use the base case)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price ($)
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Debt share of the purchase price (0.0-1.0); equity becomes the remainder
    #[arg(long)]
    pub debt_pct: Option<Decimal>,

    /// Exit EV/EBITDA multiple
    #[arg(long)]
    pub exit_multiple: Option<Decimal>,

    /// Annual revenue growth (0.0-1.0, may be negative)
    #[arg(long, allow_hyphen_values = true)]
    pub revenue_growth: Option<Decimal>,
}

impl AssumptionArgs {
    fn overrides(&self) -> AssumptionOverrides {
        AssumptionOverrides {
            purchase_price: self.purchase_price,
            debt_pct: self.debt_pct,
            exit_multiple: self.exit_multiple,
            revenue_growth: self.revenue_growth,
        }
    }
}

/// Arguments for the full model
#[derive(Args)]
pub struct ModelArgs {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    /// Ask whether to run the base case or enter custom levers
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Exit multiples for the sensitivity table (comma-separated, default 8,9,10,11,12)
    #[arg(long, value_delimiter = ',')]
    pub multiples: Option<Vec<Decimal>>,
}

/// Arguments for the exit multiple sensitivity
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    /// Explicit exit multiples (comma-separated)
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["min", "max", "step"])]
    pub multiples: Option<Vec<Decimal>>,

    /// Lowest multiple of a range sweep
    #[arg(long, requires_all = ["max", "step"])]
    pub min: Option<Decimal>,

    /// Highest multiple of a range sweep
    #[arg(long, requires_all = ["min", "step"])]
    pub max: Option<Decimal>,

    /// Increment of a range sweep
    #[arg(long, requires_all = ["min", "max"])]
    pub step: Option<Decimal>,
}

/// Load assumptions from file, then piped stdin, then the base case, and
/// apply any flag overrides on top.
pub fn load_assumptions(args: &AssumptionArgs) -> Result<Assumptions, Box<dyn std::error::Error>> {
    let base: Assumptions = if let Some(ref path) = args.input {
        info!(path = %path, "loading assumptions from file");
        input::file::read_config(path)?
    } else if let Some(piped) = input::stdin::read_stdin::<Assumptions>()? {
        info!("loading assumptions from stdin");
        piped
    } else {
        debug!("using base-case assumptions");
        Assumptions::default()
    };

    let overrides = args.overrides();
    if overrides.is_empty() {
        return Ok(base);
    }
    debug!(?overrides, "applying assumption overrides");
    Ok(base.with_overrides(&overrides))
}

pub fn run_model(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut assumptions = load_assumptions(&args.assumptions)?;
    if args.interactive {
        if !input::stdin::is_tty() {
            return Err("--interactive requires a terminal on stdin".into());
        }
        assumptions = prompt::prompt_assumptions(assumptions)?;
    }

    let multiples = args
        .multiples
        .unwrap_or_else(|| DEFAULT_EXIT_MULTIPLES.to_vec());

    info!(
        holding_period = assumptions.holding_period,
        exit_multiple = %assumptions.exit_multiple,
        "running LBO model"
    );
    let result = model::build_lbo_model(&assumptions, &multiples)?;
    for warning in &result.warnings {
        debug!(%warning, "model warning");
    }
    info!(
        irr = %result.result.returns.irr,
        elapsed_us = result.metadata.computation_time_us,
        "model complete"
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_project(args: AssumptionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(&args)?;
    let result = model::build_projection(&assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: AssumptionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(&args)?;
    let result = model::build_debt_schedule(&assumptions)?;
    info!(
        ending_term_loan = %result.result.ending_term_loan,
        ending_revolver = %result.result.ending_revolver,
        "schedule built"
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_amortisation(args: AssumptionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(&args)?;
    let result = model::build_amortisation_table(&assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(&args.assumptions)?;

    let multiples = match (args.multiples, args.min, args.max, args.step) {
        (Some(list), _, _, _) => list,
        (None, Some(min), Some(max), Some(step)) => {
            ExitMultipleRange { min, max, step }.multiples()?
        }
        _ => DEFAULT_EXIT_MULTIPLES.to_vec(),
    };
    debug!(count = multiples.len(), "running exit multiple sensitivity");

    let result = model::build_sensitivity_table(&assumptions, &multiples)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_base_case() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(Assumptions::default())?)
}
