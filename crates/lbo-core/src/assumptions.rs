use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LboError;
use crate::types::*;
use crate::LboResult;

/// Deal inputs for a leveraged buyout.
///
/// Every field has a base-case default, so a config file only needs the
/// fields it changes. The value is never mutated by the engine; variations
/// (custom runs, sensitivity cases) are built as new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    // Purchase & capital structure
    /// Enterprise value paid at entry
    pub purchase_price: Money,
    /// Share of the purchase price funded by the term loan
    pub debt_pct: Rate,
    /// Share of the purchase price funded by sponsor equity
    pub equity_pct: Rate,

    // Operating drivers
    /// Revenue in the year before the first projection year
    pub starting_revenue: Money,
    /// Annual revenue growth (may be negative)
    pub revenue_growth: Rate,
    pub ebitda_margin: Rate,

    // Cash-flow drivers
    /// Tax on positive EBIT
    pub tax_rate: Rate,
    /// Capital expenditure as a share of revenue
    pub capex_pct: Rate,
    /// Working capital build as a share of the revenue increase
    pub wc_pct: Rate,
    /// Depreciation & amortisation as a share of revenue
    pub d_and_a_pct: Rate,

    // Debt structure
    /// Term loan cash interest rate
    pub interest_rate: Rate,
    /// Mandatory amortisation as a share of the opening term loan
    pub amort_rate: Rate,
    /// Share of positive levered FCF swept to the term loan
    pub cash_sweep_pct: Rate,
    pub revolver_limit: Money,
    /// Revolver rate. Carried for reference; revolver interest is not charged.
    pub revolver_rate: Rate,

    // Exit
    pub exit_multiple: Multiple,
    /// Years held, also the number of projection years
    pub holding_period: u32,

    // Waterfall
    /// First IRR hurdle (0.12 = 12%)
    pub hurdle_1: Rate,
    /// Second IRR hurdle
    pub hurdle_2: Rate,
    /// GP promote once the first hurdle is cleared
    pub promote_1: Rate,
    /// Additional GP promote once the second hurdle is cleared
    pub promote_2: Rate,

    /// Closing date; when set, each projection year carries its period end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            purchase_price: dec!(500_000_000),
            debt_pct: dec!(0.60),
            equity_pct: dec!(0.40),
            starting_revenue: dec!(200_000_000),
            revenue_growth: dec!(0.08),
            ebitda_margin: dec!(0.22),
            tax_rate: dec!(0.25),
            capex_pct: dec!(0.03),
            wc_pct: dec!(0.02),
            d_and_a_pct: dec!(0.02),
            interest_rate: dec!(0.08),
            amort_rate: dec!(0.05),
            cash_sweep_pct: dec!(0.75),
            revolver_limit: dec!(20_000_000),
            revolver_rate: dec!(0.06),
            exit_multiple: dec!(10),
            holding_period: 5,
            hurdle_1: dec!(0.12),
            hurdle_2: dec!(0.18),
            promote_1: dec!(0.10),
            promote_2: dec!(0.20),
            transaction_date: None,
        }
    }
}

/// Longest holding period accepted; every projection year is materialised.
pub const MAX_HOLDING_PERIOD: u32 = 100;

impl Assumptions {
    /// Sponsor equity cheque at entry.
    pub fn initial_equity(&self) -> Money {
        self.purchase_price * self.equity_pct
    }

    /// Term loan drawn at entry.
    pub fn initial_debt(&self) -> Money {
        self.purchase_price * self.debt_pct
    }

    /// Reject malformed deal inputs.
    ///
    /// A zero holding period passes: it is a domain failure of the IRR,
    /// reported by the returns step. Values that pass can still overflow
    /// Decimal downstream, which the engine reports as a Domain error.
    pub fn validate(&self) -> LboResult<()> {
        if self.holding_period > MAX_HOLDING_PERIOD {
            return Err(invalid(
                "holding_period",
                &format!("Holding period cannot exceed {MAX_HOLDING_PERIOD} years"),
            ));
        }
        if self.purchase_price <= Decimal::ZERO {
            return Err(invalid("purchase_price", "Purchase price must be positive"));
        }
        if self.starting_revenue <= Decimal::ZERO {
            return Err(invalid(
                "starting_revenue",
                "Starting revenue must be positive",
            ));
        }
        if self.exit_multiple <= Decimal::ZERO {
            return Err(invalid("exit_multiple", "Exit multiple must be positive"));
        }
        if self.revenue_growth <= dec!(-1) {
            return Err(invalid(
                "revenue_growth",
                "Revenue growth must be greater than -100%",
            ));
        }

        let fractions = [
            ("debt_pct", self.debt_pct),
            ("equity_pct", self.equity_pct),
            ("ebitda_margin", self.ebitda_margin),
            ("tax_rate", self.tax_rate),
            ("capex_pct", self.capex_pct),
            ("wc_pct", self.wc_pct),
            ("d_and_a_pct", self.d_and_a_pct),
            ("amort_rate", self.amort_rate),
            ("cash_sweep_pct", self.cash_sweep_pct),
            ("revolver_rate", self.revolver_rate),
            ("promote_1", self.promote_1),
            ("promote_2", self.promote_2),
        ];
        for (field, value) in fractions {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(invalid(field, "Must be a fraction between 0 and 1"));
            }
        }

        if self.debt_pct + self.equity_pct != Decimal::ONE {
            return Err(invalid(
                "equity_pct",
                &format!(
                    "debt_pct + equity_pct must equal 1 (got {})",
                    self.debt_pct + self.equity_pct
                ),
            ));
        }

        let non_negative = [
            ("interest_rate", self.interest_rate),
            ("revolver_limit", self.revolver_limit),
            ("hurdle_1", self.hurdle_1),
            ("hurdle_2", self.hurdle_2),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(invalid(field, "Cannot be negative"));
            }
        }

        Ok(())
    }

    /// Build a new value with the given overrides applied.
    pub fn with_overrides(&self, overrides: &AssumptionOverrides) -> Assumptions {
        let mut custom = self.clone();
        if let Some(price) = overrides.purchase_price {
            custom.purchase_price = price;
        }
        if let Some(debt_pct) = overrides.debt_pct {
            custom.debt_pct = debt_pct;
            custom.equity_pct = Decimal::ONE - debt_pct;
        }
        if let Some(multiple) = overrides.exit_multiple {
            custom.exit_multiple = multiple;
        }
        if let Some(growth) = overrides.revenue_growth {
            custom.revenue_growth = growth;
        }
        custom
    }
}

/// The deal levers a user may change on top of the base case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssumptionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Money>,
    /// Equity share follows as `1 - debt_pct`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_multiple: Option<Multiple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_growth: Option<Rate>,
}

impl AssumptionOverrides {
    pub fn is_empty(&self) -> bool {
        self.purchase_price.is_none()
            && self.debt_pct.is_none()
            && self.exit_multiple.is_none()
            && self.revenue_growth.is_none()
    }
}

fn invalid(field: &str, reason: &str) -> LboError {
    LboError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_case_is_valid() {
        let base = Assumptions::default();
        assert!(base.validate().is_ok());
        assert_eq!(base.initial_equity(), dec!(200_000_000));
        assert_eq!(base.initial_debt(), dec!(300_000_000));
    }

    #[test]
    fn test_capital_structure_must_sum_to_one() {
        let input = Assumptions {
            debt_pct: dec!(0.70),
            ..Assumptions::default()
        };
        match input.validate() {
            Err(LboError::InvalidInput { field, .. }) => assert_eq!(field, "equity_pct"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_fraction_out_of_range() {
        let input = Assumptions {
            tax_rate: dec!(1.25),
            ..Assumptions::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_non_positive_purchase_price() {
        let input = Assumptions {
            purchase_price: Decimal::ZERO,
            ..Assumptions::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_negative_growth_allowed() {
        let input = Assumptions {
            revenue_growth: dec!(-0.10),
            ..Assumptions::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_zero_holding_period_passes_validation() {
        let input = Assumptions {
            holding_period: 0,
            ..Assumptions::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_holding_period_upper_bound() {
        let at_limit = Assumptions {
            holding_period: MAX_HOLDING_PERIOD,
            ..Assumptions::default()
        };
        assert!(at_limit.validate().is_ok());

        let beyond = Assumptions {
            holding_period: 1000,
            ..Assumptions::default()
        };
        match beyond.validate() {
            Err(LboError::InvalidInput { field, .. }) => assert_eq!(field, "holding_period"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_overrides_rebalance_equity() {
        let base = Assumptions::default();
        let custom = base.with_overrides(&AssumptionOverrides {
            debt_pct: Some(dec!(0.70)),
            exit_multiple: Some(dec!(9)),
            ..AssumptionOverrides::default()
        });

        assert_eq!(custom.debt_pct, dec!(0.70));
        assert_eq!(custom.equity_pct, dec!(0.30));
        assert_eq!(custom.exit_multiple, dec!(9));
        assert!(custom.validate().is_ok());
        // The base value is untouched
        assert_eq!(base.exit_multiple, dec!(10));
    }

    #[test]
    fn test_partial_config_falls_back_to_base_case() {
        let input: Assumptions =
            serde_json::from_str(r#"{ "purchase_price": "400000000", "holding_period": 7 }"#)
                .unwrap();
        assert_eq!(input.purchase_price, dec!(400_000_000));
        assert_eq!(input.holding_period, 7);
        assert_eq!(input.ebitda_margin, dec!(0.22));
        assert!(input.transaction_date.is_none());
    }
}
