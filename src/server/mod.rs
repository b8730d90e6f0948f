//! JSON-RPC server over stdio for browsing church orientations
//!
//! One request per line on stdin, one response per line on stdout. Logs go
//! to stderr.
//!
//! # Module Structure
//! - `protocol` - JSON-RPC request/response types
//! - `state` - Session state (rows, selection, config)
//! - `util` - Param decoding and logging setup
//! - `handlers` - Request handlers organized by functionality

pub mod handlers;
pub mod protocol;
pub mod state;
pub mod util;

pub use protocol::{error_codes, ErrorResponse, Request, Response};
pub use state::{Session, SessionStatus, StatusLevel};

use handlers::*;

/// Route one request to its handler
pub fn handle_request(session: &mut Session, request: Request) -> Response {
    let Request { id, method, params } = request;
    match method.as_str() {
        "LoadOverpass" => handle_load_overpass(session, id, params),
        "ImportGeoJson" => handle_import_geojson(session, id, params),
        "GetRows" => handle_get_rows(session, id),
        "Select" => handle_select(session, id, params),
        "SetSelectionMode" => handle_set_selection_mode(session, id, params),
        "GetHistogram" => handle_get_histogram(session, id, params),
        "ExportCsv" => handle_export_csv(session, id, params),
        "ExportGeoJson" => handle_export_geojson(session, id, params),
        "BuildOverpassQuery" => handle_build_overpass_query(id, params),
        "BuildGeocodeRequest" => handle_build_geocode_request(id, params),
        "ParseGeocode" => handle_parse_geocode(id, params),
        "GetStatus" => handle_get_status(session, id),
        "Close" => handle_close(session, id),
        _ => {
            log::warn!("Unknown method: {}", method);
            let message = format!("Method not found: {}", method);
            Response::error(id, error_codes::METHOD_NOT_FOUND, message)
        }
    }
}

/// Handle one input line and return the serialized response, or `None` for a blank line
pub fn handle_line(session: &mut Session, line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<serde_json::Value>(line) {
        Err(e) => {
            log::warn!("Failed to parse request: {}", e);
            Response::error(None, error_codes::PARSE_ERROR, format!("Parse error: {}", e))
        }
        Ok(value) => {
            let id = value.get("id").cloned();
            match serde_json::from_value::<Request>(value) {
                Ok(request) => {
                    log::debug!("Request: {}", request.method);
                    handle_request(session, request)
                }
                Err(e) => {
                    let message = format!("Invalid request: {}", e);
                    Response::error(id, error_codes::INVALID_REQUEST, message)
                }
            }
        }
    };

    Some(serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"id":null,"error":{{"code":{},"message":"Failed to serialize response: {}"}}}}"#,
            error_codes::INTERNAL_ERROR,
            e.to_string().replace('"', "'")
        )
    }))
}
