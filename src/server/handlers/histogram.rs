//! GetHistogram: rose diagram bins over a row field

use crate::histogram::{histogram_for_rows, HistogramField};
use crate::server::protocol::{error_codes, Response};
use crate::server::state::Session;
use crate::server::util::parse_params;
use serde::Deserialize;

/// Handle GetHistogram request - bins `field` (default orientation) at `bin_width` (default from config)
pub fn handle_get_histogram(
    session: &Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct HistogramParams {
        #[serde(default)]
        field: HistogramField,
        #[serde(default)]
        bin_width: Option<f64>,
    }

    let params: HistogramParams = match parse_params(&id, params, "{field?: string, bin_width?: number}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    if !session.is_loaded() {
        return Response::error(id, error_codes::NO_DATA_LOADED, "No data loaded".to_string());
    }

    let bin_width = params.bin_width.unwrap_or(session.config.bin_width_deg);
    let histogram = match histogram_for_rows(&session.rows, params.field, bin_width) {
        Ok(h) => h,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("Invalid params: {}", e)),
    };

    match serde_json::to_value(&histogram) {
        Ok(mut value) => {
            value["field"] = serde_json::json!(params.field);
            Response::success(id, value)
        }
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, format!("Failed to serialize histogram: {}", e)),
    }
}
