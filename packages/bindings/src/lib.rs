use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use lbo_core::lbo::{amortisation, model, projection, schedule, sensitivity};
use lbo_core::Assumptions;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_assumptions(input_json: &str) -> NapiResult<Assumptions> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

/// `None` or an empty string means the default 8x-12x set.
fn parse_multiples(multiples_json: Option<String>) -> NapiResult<Vec<Decimal>> {
    match multiples_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(to_napi_error)
        }
        _ => Ok(sensitivity::DEFAULT_EXIT_MULTIPLES.to_vec()),
    }
}

// ---------------------------------------------------------------------------
// Full model
// ---------------------------------------------------------------------------

#[napi]
pub fn build_lbo_model(input_json: String, multiples_json: Option<String>) -> NapiResult<String> {
    let input = parse_assumptions(&input_json)?;
    let multiples = parse_multiples(multiples_json)?;
    let output = model::build_lbo_model(&input, &multiples).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn base_case_assumptions() -> NapiResult<String> {
    serde_json::to_string(&Assumptions::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

#[napi]
pub fn project_financials(input_json: String) -> NapiResult<String> {
    let input = parse_assumptions(&input_json)?;
    input.validate().map_err(to_napi_error)?;
    let output = projection::project_financials(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input = parse_assumptions(&input_json)?;
    input.validate().map_err(to_napi_error)?;
    let proj = projection::project_financials(&input).map_err(to_napi_error)?;
    let output = schedule::build_schedule(&input, &proj).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn exit_multiple_sensitivity(
    input_json: String,
    multiples_json: Option<String>,
) -> NapiResult<String> {
    let input = parse_assumptions(&input_json)?;
    let multiples = parse_multiples(multiples_json)?;
    let output = model::build_sensitivity_table(&input, &multiples).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortisation_schedule(input_json: String) -> NapiResult<String> {
    let input = parse_assumptions(&input_json)?;
    input.validate().map_err(to_napi_error)?;
    let output = amortisation::build_amortisation_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
