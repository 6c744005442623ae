use chrono::NaiveDate;
use lbo_core::lbo::{amortisation, model, projection, returns, schedule, sensitivity};
use lbo_core::{AssumptionOverrides, Assumptions, LboError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn close(a: Decimal, b: Decimal, tol: Decimal) -> bool {
    (a - b).abs() < tol
}

// ===========================================================================
// Projection
// ===========================================================================

#[test]
fn test_base_case_known_answers() {
    let input = Assumptions::default();
    let proj = projection::project_financials(&input).unwrap();

    assert_eq!(proj.revenues[0], dec!(216_000_000));
    assert_eq!(proj.ebitdas[0], dec!(47_520_000));
    assert_eq!(input.initial_equity(), dec!(200_000_000));
}

#[test]
fn test_revenue_length_and_monotonicity() {
    for hold in 1..=10u32 {
        for growth in [dec!(0), dec!(0.02), dec!(0.15)] {
            let input = Assumptions {
                holding_period: hold,
                revenue_growth: growth,
                ..Assumptions::default()
            };
            let proj = projection::project_financials(&input).unwrap();
            assert_eq!(proj.revenues.len(), hold as usize);
            assert_eq!(proj.ebitdas.len(), hold as usize);
            for pair in proj.revenues.windows(2) {
                assert!(pair[1] >= pair[0], "growth {growth}, hold {hold}");
            }
        }
    }
}

// ===========================================================================
// Cash flow & debt schedule
// ===========================================================================

#[test]
fn test_term_loan_non_negative_and_non_increasing() {
    for amort in [dec!(0), dec!(0.05), dec!(0.10), dec!(0.40)] {
        for sweep in [dec!(0), dec!(0.75), dec!(1)] {
            let input = Assumptions {
                amort_rate: amort,
                cash_sweep_pct: sweep,
                holding_period: 8,
                ..Assumptions::default()
            };
            let proj = projection::project_financials(&input).unwrap();
            let sched = schedule::build_schedule(&input, &proj).unwrap();

            let mut previous = input.initial_debt();
            for record in &sched.years {
                assert!(record.ending_term_loan >= Decimal::ZERO);
                assert!(
                    record.ending_term_loan <= previous,
                    "Term loan rose in year {} (amort {amort}, sweep {sweep})",
                    record.year
                );
                previous = record.ending_term_loan;
            }
        }
    }
}

#[test]
fn test_revolver_never_exceeds_limit() {
    for limit in [dec!(0), dec!(5_000_000), dec!(20_000_000), dec!(1_000_000_000)] {
        let input = Assumptions {
            interest_rate: dec!(0.40),
            revenue_growth: dec!(-0.30),
            revolver_limit: limit,
            ..Assumptions::default()
        };
        let proj = projection::project_financials(&input).unwrap();
        let sched = schedule::build_schedule(&input, &proj).unwrap();

        for record in &sched.years {
            assert!(record.ending_revolver <= limit);
            assert!(record.revolver_draw >= Decimal::ZERO);
        }
        assert!(sched.ending_revolver <= limit);
    }
}

#[test]
fn test_revolver_draw_does_not_fund_term_loan() {
    let input = Assumptions {
        interest_rate: dec!(0.50),
        revenue_growth: dec!(-0.50),
        ..Assumptions::default()
    };
    let proj = projection::project_financials(&input).unwrap();
    let sched = schedule::build_schedule(&input, &proj).unwrap();

    let y1 = &sched.years[0];
    assert!(y1.revolver_draw > Decimal::ZERO);
    // Only mandatory amortisation reduces the loan when FCF is negative
    assert_eq!(y1.sweep_paydown, Decimal::ZERO);
    assert_eq!(
        y1.ending_term_loan,
        y1.opening_term_loan - y1.mandatory_paydown
    );
}

#[test]
fn test_amortisation_variants() {
    let five = Assumptions::default();
    let ten = Assumptions {
        amort_rate: dec!(0.10),
        ..Assumptions::default()
    };

    let proj_five = projection::project_financials(&five).unwrap();
    let proj_ten = projection::project_financials(&ten).unwrap();
    let sched_five = schedule::build_schedule(&five, &proj_five).unwrap();
    let sched_ten = schedule::build_schedule(&ten, &proj_ten).unwrap();

    assert!(sched_ten.ending_term_loan < sched_five.ending_term_loan);
    assert!(sched_ten.total_interest < sched_five.total_interest);
}

// ===========================================================================
// Returns & waterfall
// ===========================================================================

#[test]
fn test_waterfall_bands_exhaustive() {
    let input = Assumptions::default();
    let proj = projection::project_financials(&input).unwrap();
    let sched = schedule::build_schedule(&input, &proj).unwrap();

    let mut multiple = dec!(3);
    while multiple <= dec!(20) {
        let r = returns::calculate_returns_at_multiple(&input, &sched, &proj.ebitdas, multiple)
            .unwrap();
        let expected = if r.irr <= dec!(12) {
            returns::WaterfallBand::BelowHurdle
        } else if r.irr <= dec!(18) {
            returns::WaterfallBand::MidBand
        } else {
            returns::WaterfallBand::UpperBand
        };
        assert_eq!(r.band, expected);
        if r.profit >= Decimal::ZERO {
            assert!(close(r.lp_take + r.gp_take, r.net_equity_value, dec!(0.000001)));
            assert!(r.gp_take >= Decimal::ZERO);
        }
        multiple += dec!(0.5);
    }
}

#[test]
fn test_zero_holding_period_domain_error() {
    let input = Assumptions {
        holding_period: 0,
        ..Assumptions::default()
    };
    let proj = projection::project_financials(&input).unwrap();
    let sched = schedule::build_schedule(&input, &proj).unwrap();
    let result = returns::calculate_returns(&input, &sched, &proj.ebitdas);
    assert!(matches!(result, Err(LboError::Domain(_))));
}

#[test]
fn test_negative_net_equity_domain_error() {
    let input = Assumptions {
        exit_multiple: dec!(2),
        ..Assumptions::default()
    };
    let proj = projection::project_financials(&input).unwrap();
    let sched = schedule::build_schedule(&input, &proj).unwrap();
    let result = returns::calculate_returns(&input, &sched, &proj.ebitdas);
    match result {
        Err(LboError::Domain(msg)) => assert!(msg.contains("negative")),
        other => panic!("Expected Domain error, got {other:?}"),
    }
}

#[test]
fn test_moic_consistent_with_irr() {
    let input = Assumptions::default();
    let proj = projection::project_financials(&input).unwrap();
    let sched = schedule::build_schedule(&input, &proj).unwrap();
    let r = returns::calculate_returns(&input, &sched, &proj.ebitdas).unwrap();

    // (1 + irr)^5 == moic
    let growth = Decimal::ONE + r.irr / dec!(100);
    let compounded = growth * growth * growth * growth * growth;
    assert!(close(compounded, r.moic, dec!(0.0001)), "{compounded} vs {}", r.moic);
}

// ===========================================================================
// Sensitivity
// ===========================================================================

#[test]
fn test_sensitivity_known_irrs() {
    let input = Assumptions::default();
    let proj = projection::project_financials(&input).unwrap();
    let sched = schedule::build_schedule(&input, &proj).unwrap();
    let points = sensitivity::run_exit_multiple_sensitivity(
        &input,
        &sched,
        &proj.ebitdas,
        &sensitivity::DEFAULT_EXIT_MULTIPLES,
    )
    .unwrap();

    let expected = [
        dec!(10.933),
        dec!(14.907),
        dec!(18.397),
        dec!(21.518),
        dec!(24.348),
    ];
    for (point, irr) in points.iter().zip(expected) {
        assert!(
            close(point.irr, irr, dec!(0.01)),
            "{}x: expected ~{irr}, got {}",
            point.exit_multiple,
            point.irr
        );
    }
}

#[test]
fn test_sensitivity_with_ten_percent_amortisation() {
    let input = Assumptions {
        amort_rate: dec!(0.10),
        ..Assumptions::default()
    };
    let proj = projection::project_financials(&input).unwrap();
    let sched = schedule::build_schedule(&input, &proj).unwrap();
    let points = sensitivity::run_exit_multiple_sensitivity(
        &input,
        &sched,
        &proj.ebitdas,
        &sensitivity::DEFAULT_EXIT_MULTIPLES,
    )
    .unwrap();

    // Faster paydown leaves more equity at every multiple
    assert!(close(points[0].irr, dec!(14.574), dec!(0.01)), "got {}", points[0].irr);
    assert!(close(points[2].irr, dec!(21.252), dec!(0.01)), "got {}", points[2].irr);
}

// ===========================================================================
// Full model
// ===========================================================================

#[test]
fn test_full_model_consistency() {
    let result =
        model::build_lbo_model(&Assumptions::default(), &sensitivity::DEFAULT_EXIT_MULTIPLES)
            .unwrap();
    let out = &result.result;

    let last = out.schedule.years.last().unwrap();
    assert_eq!(out.schedule.ending_term_loan, last.ending_term_loan);
    assert_eq!(out.returns.exit_value, last.ebitda * dec!(10));
    assert_eq!(out.sensitivity[2].irr, out.returns.irr);
    assert_eq!(result.assumptions["holding_period"], 5);
}

#[test]
fn test_custom_overrides_run() {
    let custom = Assumptions::default().with_overrides(&AssumptionOverrides {
        purchase_price: Some(dec!(450_000_000)),
        debt_pct: Some(dec!(0.50)),
        exit_multiple: Some(dec!(11)),
        revenue_growth: Some(dec!(0.10)),
    });
    let result = model::build_lbo_model(&custom, &sensitivity::DEFAULT_EXIT_MULTIPLES).unwrap();

    assert_eq!(result.result.returns.initial_equity, dec!(225_000_000));
    assert_eq!(result.result.schedule.years[0].opening_term_loan, dec!(225_000_000));
    assert_eq!(result.result.projection.revenues[0], dec!(220_000_000));
}

#[test]
fn test_model_from_json_config() {
    let json = r#"{
        "purchase_price": 500000000,
        "debt_pct": "0.6",
        "equity_pct": "0.4",
        "amort_rate": 0.10,
        "transaction_date": "2025-06-30"
    }"#;
    let input: Assumptions = serde_json::from_str(json).unwrap();
    assert_eq!(input.amort_rate, dec!(0.10));
    assert_eq!(input.transaction_date, NaiveDate::from_ymd_opt(2025, 6, 30));

    let result = model::build_lbo_model(&input, &[dec!(10)]).unwrap();
    let y5 = &result.result.schedule.years[4];
    assert_eq!(y5.period_end, NaiveDate::from_ymd_opt(2030, 6, 30));
}

#[test]
fn test_model_rejects_overlong_holding_period() {
    let input = Assumptions {
        holding_period: 1000,
        ..Assumptions::default()
    };
    let result = model::build_lbo_model(&input, &sensitivity::DEFAULT_EXIT_MULTIPLES);
    assert!(matches!(
        result,
        Err(LboError::InvalidInput { ref field, .. }) if field == "holding_period"
    ));
}

#[test]
fn test_model_overflow_surfaces_as_domain_error() {
    // Exit value past the Decimal range
    let huge_multiple = Assumptions {
        exit_multiple: dec!(10_000_000_000_000_000_000_000),
        ..Assumptions::default()
    };
    assert!(huge_multiple.validate().is_ok());
    assert!(matches!(
        model::build_lbo_model(&huge_multiple, &sensitivity::DEFAULT_EXIT_MULTIPLES),
        Err(LboError::Domain(_))
    ));

    // Revenue doubling for a century
    let runaway_growth = Assumptions {
        revenue_growth: dec!(1),
        holding_period: 100,
        ..Assumptions::default()
    };
    assert!(runaway_growth.validate().is_ok());
    assert!(matches!(
        model::build_lbo_model(&runaway_growth, &sensitivity::DEFAULT_EXIT_MULTIPLES),
        Err(LboError::Domain(_))
    ));
}

#[test]
fn test_sensitivity_table_rejects_oversized_range() {
    let range = sensitivity::ExitMultipleRange {
        min: dec!(0.0001),
        max: dec!(1_000_000),
        step: dec!(0.0001),
    };
    assert!(matches!(range.multiples(), Err(LboError::InvalidInput { .. })));
}

#[test]
fn test_amortisation_table_ten_percent() {
    let input = Assumptions {
        amort_rate: dec!(0.10),
        ..Assumptions::default()
    };
    let table = amortisation::build_amortisation_schedule(&input).unwrap();
    let endings: Vec<Decimal> = table.periods.iter().map(|p| p.ending_debt).collect();
    assert_eq!(
        endings,
        vec![
            dec!(270_000_000),
            dec!(243_000_000),
            dec!(218_700_000),
            dec!(196_830_000),
            dec!(177_147_000),
        ]
    );
}
