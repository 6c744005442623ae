use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::Assumptions;
use crate::lbo::amortisation::{self, AmortisationSchedule};
use crate::lbo::projection::{self, Projection};
use crate::lbo::returns::{self, ReturnsResult};
use crate::lbo::schedule::{self, DebtSchedule};
use crate::lbo::sensitivity::{self, SensitivityPoint};
use crate::types::*;
use crate::LboResult;

/// Full LBO model output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LboOutput {
    /// Revenue and EBITDA per year
    pub projection: Projection,
    /// Year-by-year cash flow and debt ledger
    pub schedule: DebtSchedule,
    /// Exit value, IRR and LP/GP split at the assumed exit multiple
    pub returns: ReturnsResult,
    /// IRR across exit multiples over the same schedule
    pub sensitivity: Vec<SensitivityPoint>,
}

/// Run the full model: projection, schedule, returns and exit-multiple sensitivity.
pub fn build_lbo_model(
    input: &Assumptions,
    multiples: &[Multiple],
) -> LboResult<ComputationOutput<LboOutput>> {
    let start = Instant::now();
    input.validate()?;

    let projection = projection::project_financials(input)?;
    let schedule = schedule::build_schedule(input, &projection)?;
    let returns = returns::calculate_returns(input, &schedule, &projection.ebitdas)?;
    let sensitivity = sensitivity::run_exit_multiple_sensitivity(
        input,
        &schedule,
        &projection.ebitdas,
        multiples,
    )?;

    let mut warnings = schedule_warnings(input, &schedule);
    if input.hurdle_1 > input.hurdle_2 {
        warnings.push(format!(
            "hurdle_1 ({}) exceeds hurdle_2 ({}); the mid band is empty",
            input.hurdle_1, input.hurdle_2
        ));
    }
    if returns.gp_take < Decimal::ZERO {
        warnings.push(format!(
            "GP promote is negative ({}) because profit is below zero",
            returns.gp_take
        ));
    }

    let output = LboOutput {
        projection,
        schedule,
        returns,
        sensitivity,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Leveraged Buyout Model (term loan, revolver, cash sweep, tiered promote)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Revenue and EBITDA projection only.
pub fn build_projection(input: &Assumptions) -> LboResult<ComputationOutput<Projection>> {
    let start = Instant::now();
    input.validate()?;

    let output = projection::project_financials(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Revenue & EBITDA Projection",
        &serde_json::json!({
            "starting_revenue": input.starting_revenue.to_string(),
            "revenue_growth": input.revenue_growth.to_string(),
            "ebitda_margin": input.ebitda_margin.to_string(),
            "holding_period": input.holding_period,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Projection plus the cash flow and debt ledger.
pub fn build_debt_schedule(input: &Assumptions) -> LboResult<ComputationOutput<DebtSchedule>> {
    let start = Instant::now();
    input.validate()?;

    let projection = projection::project_financials(input)?;
    let output = schedule::build_schedule(input, &projection)?;
    let warnings = schedule_warnings(input, &output);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cash Flow & Debt Schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Exit-multiple sensitivity over the base schedule.
pub fn build_sensitivity_table(
    input: &Assumptions,
    multiples: &[Multiple],
) -> LboResult<ComputationOutput<Vec<SensitivityPoint>>> {
    let start = Instant::now();
    input.validate()?;

    let projection = projection::project_financials(input)?;
    let schedule = schedule::build_schedule(input, &projection)?;
    let output = sensitivity::run_exit_multiple_sensitivity(
        input,
        &schedule,
        &projection.ebitdas,
        multiples,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit Multiple Sensitivity (IRR %)",
        &serde_json::json!({
            "multiples": multiples.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
            "ending_term_loan": schedule.ending_term_loan.to_string(),
            "ending_revolver": schedule.ending_revolver.to_string(),
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Plain term loan amortisation table.
pub fn build_amortisation_table(
    input: &Assumptions,
) -> LboResult<ComputationOutput<AmortisationSchedule>> {
    let start = Instant::now();
    input.validate()?;

    let output = amortisation::build_amortisation_schedule(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Term Loan Amortisation Schedule",
        &serde_json::json!({
            "opening_debt": input.initial_debt().to_string(),
            "interest_rate": input.interest_rate.to_string(),
            "amort_rate": input.amort_rate.to_string(),
            "holding_period": input.holding_period,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

fn schedule_warnings(input: &Assumptions, schedule: &DebtSchedule) -> Vec<String> {
    let mut warnings = Vec::new();
    for record in &schedule.years {
        if record.unfunded_shortfall > Decimal::ZERO {
            warnings.push(format!(
                "Year {}: revolver headroom exhausted; {} of cash shortfall unfunded",
                record.year, record.unfunded_shortfall
            ));
        }
        let scheduled = record.mandatory_paydown + record.sweep_paydown;
        if record.opening_term_loan > Decimal::ZERO && scheduled > record.opening_term_loan {
            warnings.push(format!(
                "Year {}: scheduled paydown {} exceeds term loan balance {}; loan repaid in full",
                record.year, scheduled, record.opening_term_loan
            ));
        }
    }
    if schedule.ending_revolver > Decimal::ZERO && input.revolver_rate > Decimal::ZERO {
        warnings.push(format!(
            "Revolver balance {} carries no interest charge in levered FCF",
            schedule.ending_revolver
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LboError;
    use crate::lbo::sensitivity::DEFAULT_EXIT_MULTIPLES;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_case_model() {
        let result = build_lbo_model(&Assumptions::default(), &DEFAULT_EXIT_MULTIPLES).unwrap();
        let out = &result.result;

        assert_eq!(out.projection.years(), 5);
        assert_eq!(out.schedule.years.len(), 5);
        assert_eq!(out.sensitivity.len(), 5);
        assert_eq!(out.returns.exit_multiple, dec!(10));
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_invalid_assumptions_rejected() {
        let input = Assumptions {
            equity_pct: dec!(0.50),
            ..Assumptions::default()
        };
        let result = build_lbo_model(&input, &DEFAULT_EXIT_MULTIPLES);
        assert!(matches!(result, Err(LboError::InvalidInput { .. })));
    }

    #[test]
    fn test_zero_holding_period_is_domain_error() {
        let input = Assumptions {
            holding_period: 0,
            ..Assumptions::default()
        };
        let result = build_lbo_model(&input, &DEFAULT_EXIT_MULTIPLES);
        assert!(matches!(result, Err(LboError::Domain(_))));
    }

    #[test]
    fn test_revolver_warnings() {
        let input = Assumptions {
            interest_rate: dec!(0.50),
            revenue_growth: dec!(-0.50),
            ..Assumptions::default()
        };
        let result = build_debt_schedule(&input).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("revolver headroom exhausted")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("carries no interest charge")));
    }

    #[test]
    fn test_full_repayment_warning() {
        let input = Assumptions {
            amort_rate: dec!(0.60),
            cash_sweep_pct: Decimal::ONE,
            ..Assumptions::default()
        };
        let result = build_debt_schedule(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("repaid in full")));
    }

    #[test]
    fn test_amortisation_table_envelope() {
        let result = build_amortisation_table(&Assumptions::default()).unwrap();
        assert_eq!(result.result.periods.len(), 5);
        assert_eq!(result.methodology, "Term Loan Amortisation Schedule");
    }
}
