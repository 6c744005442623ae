use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::Value;

use lbo_core::lbo::model::LboOutput;
use lbo_core::lbo::sensitivity::SensitivityPoint;
use lbo_core::types::ComputationOutput;

use super::table;

/// Print a human-readable results report.
///
/// Full model output gets the year-by-year layout with returns and the
/// sensitivity lines; a sensitivity list prints only the latter. Anything
/// else falls back to the table view.
pub fn print_report(value: &Value) {
    if let Ok(out) = serde_json::from_value::<ComputationOutput<LboOutput>>(value.clone()) {
        print_model_report(&out.result);
        print_warnings(&out.warnings);
        return;
    }
    if let Ok(out) = serde_json::from_value::<ComputationOutput<Vec<SensitivityPoint>>>(value.clone())
    {
        println!("{}", "EXIT MULTIPLE SENSITIVITY".bold());
        for line in sensitivity_lines(&out.result) {
            println!("{line}");
        }
        print_warnings(&out.warnings);
        return;
    }
    table::print_table(value);
}

fn print_model_report(out: &LboOutput) {
    println!("{}", "FINAL LBO RESULTS".bold());

    println!("\nRevenue & EBITDA");
    for (i, (rev, ebitda)) in out
        .projection
        .revenues
        .iter()
        .zip(&out.projection.ebitdas)
        .enumerate()
    {
        println!(
            "  Year {}: Revenue {}  EBITDA {}",
            i + 1,
            currency(*rev),
            currency(*ebitda)
        );
    }

    println!("\nDebt");
    for rec in &out.schedule.years {
        println!(
            "  Year {}: Term Loan {}  Revolver {}",
            rec.year,
            currency(rec.ending_term_loan),
            currency(rec.ending_revolver)
        );
    }

    let r = &out.returns;
    println!("\nExit");
    println!("  Exit EV:          {}", currency(r.exit_value));
    println!("  Net Equity Value: {}", currency(r.net_equity_value));
    println!("  IRR:              {}", percent(r.irr).bold());
    println!("  MOIC:             {}", multiple(r.moic.round_dp(2)));

    println!("\nWaterfall");
    println!("  LP Take: {}", currency(r.lp_take));
    println!("  GP Take: {}", currency(r.gp_take));
    let triggered = if r.promote_triggered {
        "YES".green()
    } else {
        "NO".yellow()
    };
    println!("  Promote Triggered? {triggered}");

    if !out.sensitivity.is_empty() {
        println!("\nExit Multiple Sensitivity");
        for line in sensitivity_lines(&out.sensitivity) {
            println!("  {line}");
        }
    }
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n{}", "Warnings:".yellow());
    for w in warnings {
        println!("  - {w}");
    }
}

fn sensitivity_lines(points: &[SensitivityPoint]) -> Vec<String> {
    points
        .iter()
        .map(|p| format!("{} → IRR: {}", multiple(p.exit_multiple), percent(p.irr)))
        .collect()
}

/// Whole-dollar amount with thousands separators, e.g. `$1,234,567`.
fn currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(0).abs().trunc().to_string();
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount.round_dp(0).is_sign_negative() && !amount.round_dp(0).is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

fn multiple(value: Decimal) -> String {
    format!("{}x", value.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_groups_thousands() {
        assert_eq!(currency(dec!(181202207.6136)), "$181,202,208");
        assert_eq!(currency(dec!(999)), "$999");
        assert_eq!(currency(dec!(1000)), "$1,000");
        assert_eq!(currency(dec!(-4440000)), "-$4,440,000");
        assert_eq!(currency(dec!(0.4)), "$0");
    }

    #[test]
    fn test_percent_two_places() {
        assert_eq!(percent(dec!(18.39712)), "18.40%");
        assert_eq!(percent(dec!(-100)), "-100.00%");
    }

    #[test]
    fn test_sensitivity_line_layout() {
        let point = SensitivityPoint {
            exit_multiple: dec!(8.0),
            exit_value: dec!(517203483.03),
            net_equity_value: dec!(336001275.42),
            irr: dec!(10.9329),
            band: lbo_core::lbo::returns::WaterfallBand::BelowHurdle,
            gp_take: dec!(13600127.54),
        };
        assert_eq!(sensitivity_lines(&[point]), vec!["8x → IRR: 10.93%"]);
    }
}
