use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::LboError;
use crate::lbo::schedule::DebtSchedule;
use crate::lbo::{add, div, mul, sub};
use crate::types::*;
use crate::LboResult;

const PERCENT: Decimal = dec!(100);

/// Which branch of the promote waterfall applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterfallBand {
    /// IRR at or below the first hurdle: no promote
    BelowHurdle,
    /// IRR above the first hurdle, at or below the second
    MidBand,
    /// IRR above the second hurdle
    UpperBand,
}

impl WaterfallBand {
    /// Classify an IRR in percent against hurdles given as fractions.
    pub fn classify(irr: Percent, hurdle_1: Rate, hurdle_2: Rate) -> Self {
        if irr <= hurdle_1 * PERCENT {
            WaterfallBand::BelowHurdle
        } else if irr <= hurdle_2 * PERCENT {
            WaterfallBand::MidBand
        } else {
            WaterfallBand::UpperBand
        }
    }
}

/// Sponsor returns and the LP/GP split at exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsResult {
    pub initial_equity: Money,
    pub exit_multiple: Multiple,
    /// Exit-year EBITDA times the exit multiple
    pub exit_value: Money,
    /// Exit value less the term loan and revolver outstanding
    pub net_equity_value: Money,
    /// Point-to-point compound growth of equity, in percent
    pub irr: Percent,
    /// Multiple on invested capital
    pub moic: Multiple,
    pub profit: Money,
    pub band: WaterfallBand,
    pub lp_take: Money,
    pub gp_take: Money,
    pub promote_triggered: bool,
}

/// Compute exit value, IRR and the LP/GP split at the assumed exit multiple.
pub fn calculate_returns(
    input: &Assumptions,
    schedule: &DebtSchedule,
    ebitdas: &[Money],
) -> LboResult<ReturnsResult> {
    calculate_returns_at_multiple(input, schedule, ebitdas, input.exit_multiple)
}

/// Compute returns with an explicit exit multiple in place of the assumed one.
///
/// The schedule's ending balances are used as given; nothing is recomputed
/// for the new multiple except exit value and what follows from it.
pub fn calculate_returns_at_multiple(
    input: &Assumptions,
    schedule: &DebtSchedule,
    ebitdas: &[Money],
    exit_multiple: Multiple,
) -> LboResult<ReturnsResult> {
    if input.holding_period == 0 {
        return Err(LboError::Domain(
            "IRR is undefined for a zero-year holding period".into(),
        ));
    }
    let exit_ebitda = ebitdas.last().copied().ok_or_else(|| LboError::InvalidInput {
        field: "ebitdas".into(),
        reason: "At least one projected EBITDA value is required".into(),
    })?;

    let initial_equity = input.initial_equity();
    let exit_value = mul(exit_ebitda, exit_multiple, "exit value")?;
    let net_equity_value = exit_value - schedule.ending_term_loan - schedule.ending_revolver;

    let irr = compound_growth_irr(net_equity_value, initial_equity, input.holding_period)?;
    let moic = div(net_equity_value, initial_equity, "MOIC")?;

    let profit = net_equity_value - initial_equity;
    let band = WaterfallBand::classify(irr, input.hurdle_1, input.hurdle_2);
    // Both promotes apply to the full profit in the upper band
    let gp_take = match band {
        WaterfallBand::BelowHurdle => Decimal::ZERO,
        WaterfallBand::MidBand => profit * input.promote_1,
        WaterfallBand::UpperBand => add(
            profit * input.promote_1,
            profit * input.promote_2,
            "GP promote",
        )?,
    };
    let lp_take = sub(net_equity_value, gp_take, "LP take")?;

    Ok(ReturnsResult {
        initial_equity,
        exit_multiple,
        exit_value,
        net_equity_value,
        irr,
        moic,
        profit,
        band,
        lp_take,
        gp_take,
        promote_triggered: gp_take > Decimal::ZERO,
    })
}

/// `((exit / entry)^(1 / years) - 1) * 100`.
///
/// Not a cash-flow IRR: only the entry cheque and the exit proceeds count.
pub fn compound_growth_irr(
    exit_equity: Money,
    entry_equity: Money,
    years: u32,
) -> LboResult<Percent> {
    if years == 0 {
        return Err(LboError::Domain(
            "IRR is undefined for a zero-year holding period".into(),
        ));
    }
    if entry_equity.is_zero() {
        return Err(LboError::DivisionByZero {
            context: "IRR with zero initial equity".into(),
        });
    }

    let ratio = div(exit_equity, entry_equity, "IRR equity ratio")?;
    if ratio.is_zero() {
        return Ok(-PERCENT);
    }
    if ratio < Decimal::ZERO {
        return Err(LboError::Domain(format!(
            "IRR is undefined for a negative equity ratio ({ratio}); \
             fractional power of a negative base"
        )));
    }

    let exponent = Decimal::ONE / Decimal::from(years);
    let growth = ratio.checked_powd(exponent).ok_or_else(|| {
        LboError::Domain(format!("IRR overflow raising {ratio} to the power {exponent}"))
    })?;

    mul(growth - Decimal::ONE, PERCENT, "IRR")
}
