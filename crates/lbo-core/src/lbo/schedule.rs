use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::LboError;
use crate::lbo::projection::Projection;
use crate::lbo::{add, mul, sub, sum};
use crate::types::*;
use crate::LboResult;

/// One year of the cash flow and debt ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    pub revenue: Money,
    pub ebitda: Money,
    pub d_and_a: Money,
    pub ebit: Money,
    pub taxes: Money,
    pub capex: Money,
    pub wc_change: Money,
    /// Term loan interest on the opening balance
    pub interest_expense: Money,
    pub levered_fcf: Money,
    pub opening_term_loan: Money,
    pub mandatory_paydown: Money,
    pub sweep_paydown: Money,
    pub revolver_draw: Money,
    /// Part of a cash shortfall the revolver could not cover
    pub unfunded_shortfall: Money,
    pub ending_term_loan: Money,
    pub ending_revolver: Money,
}

/// Full ledger plus the balances left at exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSchedule {
    pub years: Vec<YearRecord>,
    pub ending_term_loan: Money,
    pub ending_revolver: Money,
    pub total_interest: Money,
    pub total_mandatory_paydown: Money,
    pub total_sweep_paydown: Money,
    pub total_revolver_draws: Money,
}

/// Running balances, only mutated while the ledger is being built.
struct DebtState {
    term_loan: Money,
    revolver: Money,
}

impl DebtState {
    /// Draw on the revolver up to its remaining headroom. Returns the amount drawn.
    fn draw_revolver(&mut self, shortfall: Money, limit: Money) -> Money {
        let headroom = (limit - self.revolver).max(Decimal::ZERO);
        let draw = shortfall.min(headroom);
        self.revolver += draw;
        draw
    }

    fn pay_down_term_loan(&mut self, paydown: Money) {
        self.term_loan = (self.term_loan - paydown).max(Decimal::ZERO);
    }
}

/// Build the year-by-year cash flow and debt ledger.
///
/// Interest is charged on the opening term loan only. Revolver draws cover
/// levered FCF shortfalls up to the limit but do not fund term loan
/// repayments, and the revolver is never repaid.
pub fn build_schedule(input: &Assumptions, projection: &Projection) -> LboResult<DebtSchedule> {
    let years = input.holding_period as usize;
    if projection.revenues.len() != years || projection.ebitdas.len() != years {
        return Err(LboError::InvalidInput {
            field: "projection".into(),
            reason: format!(
                "Expected {years} projected years, got {} revenues and {} EBITDA values",
                projection.revenues.len(),
                projection.ebitdas.len()
            ),
        });
    }

    let mut state = DebtState {
        term_loan: input.initial_debt(),
        revolver: Decimal::ZERO,
    };
    let mut records: Vec<YearRecord> = Vec::with_capacity(years);
    let mut prev_revenue = input.starting_revenue;

    for (idx, (&revenue, &ebitda)) in projection
        .revenues
        .iter()
        .zip(&projection.ebitdas)
        .enumerate()
    {
        let year = idx as u32 + 1;
        let opening_term_loan = state.term_loan;

        // Operating cash flow items
        let d_and_a = revenue * input.d_and_a_pct;
        let ebit = ebitda - d_and_a;
        let taxes = ebit.max(Decimal::ZERO) * input.tax_rate;
        let capex = revenue * input.capex_pct;
        let wc_change = (revenue - prev_revenue) * input.wc_pct;
        prev_revenue = revenue;

        let interest_expense = mul(opening_term_loan, input.interest_rate, "interest expense")?;
        let levered_fcf = [taxes, capex, wc_change, interest_expense]
            .into_iter()
            .try_fold(ebitda, |fcf, outflow| sub(fcf, outflow, "levered FCF"))?;

        // Debt service
        let mandatory_paydown = opening_term_loan * input.amort_rate;
        let sweep_paydown = (levered_fcf * input.cash_sweep_pct).max(Decimal::ZERO);
        let scheduled_paydown = add(mandatory_paydown, sweep_paydown, "term loan paydown")?;

        let (revolver_draw, unfunded_shortfall) = if levered_fcf < Decimal::ZERO {
            let shortfall = levered_fcf.abs();
            let draw = state.draw_revolver(shortfall, input.revolver_limit);
            (draw, shortfall - draw)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        state.pay_down_term_loan(scheduled_paydown);

        records.push(YearRecord {
            year,
            period_end: period_end(input.transaction_date, year),
            revenue,
            ebitda,
            d_and_a,
            ebit,
            taxes,
            capex,
            wc_change,
            interest_expense,
            levered_fcf,
            opening_term_loan,
            mandatory_paydown,
            sweep_paydown,
            revolver_draw,
            unfunded_shortfall,
            ending_term_loan: state.term_loan,
            ending_revolver: state.revolver,
        });
    }

    let total_interest = sum(records.iter().map(|r| r.interest_expense), "total interest")?;
    let total_mandatory_paydown = sum(
        records.iter().map(|r| r.mandatory_paydown),
        "total mandatory paydown",
    )?;
    let total_sweep_paydown =
        sum(records.iter().map(|r| r.sweep_paydown), "total sweep paydown")?;
    let total_revolver_draws =
        sum(records.iter().map(|r| r.revolver_draw), "total revolver draws")?;

    Ok(DebtSchedule {
        years: records,
        ending_term_loan: state.term_loan,
        ending_revolver: state.revolver,
        total_interest,
        total_mandatory_paydown,
        total_sweep_paydown,
        total_revolver_draws,
    })
}

fn period_end(transaction_date: Option<NaiveDate>, year: u32) -> Option<NaiveDate> {
    transaction_date.and_then(|date| date.checked_add_months(Months::new(12 * year)))
}
