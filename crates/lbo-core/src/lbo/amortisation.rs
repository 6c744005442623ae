use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::LboError;
use crate::lbo::{mul, sum};
use crate::types::*;
use crate::LboResult;

/// A single year of the plain term-loan amortisation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortisationPeriod {
    pub year: u32,
    pub opening_debt: Money,
    pub interest: Money,
    pub principal_payment: Money,
    pub ending_debt: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortisationSchedule {
    pub periods: Vec<AmortisationPeriod>,
    pub total_interest: Money,
    pub total_principal: Money,
}

/// Term loan amortisation with no cash sweep and no revolver.
///
/// Principal each year is `amort_rate` of the opening balance, so the loan
/// declines geometrically and is never fully repaid.
pub fn build_amortisation_schedule(input: &Assumptions) -> LboResult<AmortisationSchedule> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(LboError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }

    let mut periods = Vec::with_capacity(input.holding_period as usize);
    let mut opening = input.initial_debt();

    for year in 1..=input.holding_period {
        let interest = mul(opening, input.interest_rate, "amortisation interest")?;
        let principal_payment = opening * input.amort_rate;
        let ending = opening - principal_payment;

        periods.push(AmortisationPeriod {
            year,
            opening_debt: opening,
            interest,
            principal_payment,
            ending_debt: ending,
        });

        opening = ending;
    }

    let total_interest = sum(periods.iter().map(|p| p.interest), "total interest")?;
    let total_principal = sum(
        periods.iter().map(|p| p.principal_payment),
        "total principal",
    )?;

    Ok(AmortisationSchedule {
        periods,
        total_interest,
        total_principal,
    })
}
