use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Cash flow
// ---------------------------------------------------------------------------

#[napi]
pub fn project_cash_flows(input_json: String) -> NapiResult<String> {
    let input: chp2x_core::cashflow::projector::CashFlowInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = chp2x_core::cashflow::projector::project_cash_flows(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn schedule_payout(input_json: String) -> NapiResult<String> {
    let input: chp2x_core::cashflow::payout::PayoutInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        chp2x_core::cashflow::payout::schedule_payout(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Electrolyzer
// ---------------------------------------------------------------------------

#[napi]
pub fn electrolyzer_sweep(input_json: String) -> NapiResult<String> {
    let input: chp2x_core::electrolyzer::sweep::SweepInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        chp2x_core::electrolyzer::sweep::run_sweep(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
