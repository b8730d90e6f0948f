//! Query helpers and status: BuildOverpassQuery, BuildGeocodeRequest, ParseGeocode, GetStatus

use crate::query::{geocode_request, overpass_query, parse_geocode_response, BoundingBox, OVERPASS_URL};
use crate::server::protocol::{error_codes, Response};
use crate::server::state::Session;
use crate::server::util::parse_params;
use serde::Deserialize;

/// Handle BuildOverpassQuery request - returns the QL text for `bbox` = [south, west, north, east]
pub fn handle_build_overpass_query(id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    #[derive(Deserialize)]
    struct QueryParams {
        bbox: BoundingBox,
    }

    let params: QueryParams = match parse_params(&id, params, "{bbox: [south, west, north, east]}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    match overpass_query(&params.bbox) {
        Ok(query) => Response::success(id, serde_json::json!({
            "query": query,
            "endpoint": OVERPASS_URL,
        })),
        Err(e) => Response::error(id, error_codes::INVALID_PARAMS, format!("Invalid params: {}", e)),
    }
}

/// Handle BuildGeocodeRequest request - Nominatim endpoint and params for `place`
pub fn handle_build_geocode_request(id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    #[derive(Deserialize)]
    struct GeocodeRequestParams {
        place: String,
    }

    let params: GeocodeRequestParams = match parse_params(&id, params, "{place: string}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    let request = match geocode_request(&params.place) {
        Ok(request) => request,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("Invalid params: {}", e)),
    };
    match serde_json::to_value(&request) {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize request: {}", e),
        ),
    }
}

/// Handle ParseGeocode request - reads a Nominatim search response
pub fn handle_parse_geocode(id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    #[derive(Deserialize)]
    struct GeocodeParams {
        response: serde_json::Value,
    }

    let params: GeocodeParams = match parse_params(&id, params, "{response: array}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    match parse_geocode_response(&params.response) {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => Response::success(id, value),
            Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, format!("Failed to serialize result: {}", e)),
        },
        Err(e) => Response::error(id, error_codes::PARSE_FAILED, format!("Geocoding failed: {:#}", e)),
    }
}

/// Handle GetStatus request - session summary
pub fn handle_get_status(session: &Session, id: Option<serde_json::Value>) -> Response {
    Response::success(id, serde_json::json!({
        "loaded": session.is_loaded(),
        "source": session.source,
        "row_count": session.rows.len(),
        "selected_id": session.selected_id,
        "status": session.status,
        "stats": session.last_stats,
        "config": session.config,
    }))
}
