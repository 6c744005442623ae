use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::lbo::{add, mul};
use crate::types::*;
use crate::LboResult;

/// Revenue and EBITDA per projection year (index 0 = year 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub revenues: Vec<Money>,
    pub ebitdas: Vec<Money>,
}

impl Projection {
    pub fn years(&self) -> usize {
        self.revenues.len()
    }

    /// EBITDA of the exit year, if any year was projected.
    pub fn exit_ebitda(&self) -> Option<Money> {
        self.ebitdas.last().copied()
    }
}

/// Project revenue and EBITDA over the holding period.
///
/// Revenue compounds from `starting_revenue` at `revenue_growth`; EBITDA is
/// the margin applied to each year's revenue. A zero holding period yields
/// empty sequences. Growth that compounds past the Decimal range is a
/// Domain error.
pub fn project_financials(input: &Assumptions) -> LboResult<Projection> {
    let years = input.holding_period as usize;
    let mut revenues = Vec::with_capacity(years);
    let mut ebitdas = Vec::with_capacity(years);

    let growth_factor = add(Decimal::ONE, input.revenue_growth, "revenue growth factor")?;
    let mut revenue = input.starting_revenue;
    for _ in 0..years {
        revenue = mul(revenue, growth_factor, "projected revenue")?;
        revenues.push(revenue);
        ebitdas.push(mul(revenue, input.ebitda_margin, "projected EBITDA")?);
    }

    Ok(Projection { revenues, ebitdas })
}
