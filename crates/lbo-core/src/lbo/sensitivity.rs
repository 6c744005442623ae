use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::LboError;
use crate::lbo::returns::{self, WaterfallBand};
use crate::lbo::schedule::DebtSchedule;
use crate::lbo::{add, div, sub};
use crate::types::*;
use crate::LboResult;

/// Exit multiples swept when none are given.
pub const DEFAULT_EXIT_MULTIPLES: [Multiple; 5] = [dec!(8), dec!(9), dec!(10), dec!(11), dec!(12)];

/// Most points a range sweep may expand to.
pub const MAX_SENSITIVITY_POINTS: usize = 1_000;

/// Sweep of exit multiples from `min` to `max` in `step` increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitMultipleRange {
    pub min: Multiple,
    pub max: Multiple,
    pub step: Multiple,
}

impl ExitMultipleRange {
    /// Expand the range into explicit multiples. `max` is always included.
    pub fn multiples(&self) -> LboResult<Vec<Multiple>> {
        if self.step <= Decimal::ZERO {
            return Err(LboError::InvalidInput {
                field: "step".into(),
                reason: "Step must be positive".into(),
            });
        }
        if self.min > self.max {
            return Err(LboError::InvalidInput {
                field: "min".into(),
                reason: "Min must be <= max".into(),
            });
        }

        let span = sub(self.max, self.min, "sensitivity range")?;
        let mut points = div(span, self.step, "sensitivity range")?.floor() + Decimal::ONE;
        if !(span % self.step).is_zero() {
            points += Decimal::ONE;
        }
        if points > Decimal::from(MAX_SENSITIVITY_POINTS) {
            return Err(LboError::InvalidInput {
                field: "step".into(),
                reason: format!(
                    "Range {}..{} by {} exceeds {MAX_SENSITIVITY_POINTS} points",
                    self.min, self.max, self.step
                ),
            });
        }

        let mut values = Vec::new();
        let mut current = self.min;
        while current <= self.max {
            values.push(current);
            current = add(current, self.step, "sensitivity range")?;
        }
        // Ensure max is included if step doesn't land exactly on it
        if let Some(&last) = values.last() {
            if last < self.max {
                values.push(self.max);
            }
        }

        Ok(values)
    }
}

/// Returns at one exit multiple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub exit_multiple: Multiple,
    pub exit_value: Money,
    pub net_equity_value: Money,
    pub irr: Percent,
    pub band: WaterfallBand,
    pub gp_take: Money,
}

/// Recompute returns for each exit multiple over one fixed schedule.
///
/// Ending debt balances are those of the schedule; only exit value and the
/// IRR and waterfall that follow from it change. Points come back in the
/// order of `multiples`. Any multiple with an undefined IRR fails the run.
pub fn run_exit_multiple_sensitivity(
    input: &Assumptions,
    schedule: &DebtSchedule,
    ebitdas: &[Money],
    multiples: &[Multiple],
) -> LboResult<Vec<SensitivityPoint>> {
    if multiples.is_empty() {
        return Err(LboError::InvalidInput {
            field: "multiples".into(),
            reason: "At least one exit multiple is required".into(),
        });
    }

    multiples
        .iter()
        .map(|&multiple| {
            if multiple <= Decimal::ZERO {
                return Err(LboError::InvalidInput {
                    field: "multiples".into(),
                    reason: format!("Exit multiple must be positive, got {multiple}"),
                });
            }
            let result =
                returns::calculate_returns_at_multiple(input, schedule, ebitdas, multiple)?;
            Ok(SensitivityPoint {
                exit_multiple: multiple,
                exit_value: result.exit_value,
                net_equity_value: result.net_equity_value,
                irr: result.irr,
                band: result.band,
                gp_take: result.gp_take,
            })
        })
        .collect()
}
