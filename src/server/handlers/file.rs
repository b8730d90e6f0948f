//! Data operations: LoadOverpass, ImportGeoJson, Close

use crate::pipeline::{
    orient_geojson_file, orient_geojson_str, orient_geojson_value, orient_overpass_file, orient_overpass_str,
    orient_overpass_value, PassResult,
};
use crate::reconcile::SelectionMode;
use crate::server::protocol::{error_codes, Response};
use crate::server::state::Session;
use crate::server::util::parse_params;
use serde::Deserialize;

#[derive(Deserialize)]
struct LoadParams {
    #[serde(default)]
    file_path: Option<String>,
    /// Inline document, either JSON text or a JSON value
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Clone, Copy)]
enum InputFormat {
    Overpass,
    GeoJson,
}

impl InputFormat {
    fn label(self) -> &'static str {
        match self {
            InputFormat::Overpass => "Overpass",
            InputFormat::GeoJson => "GeoJSON",
        }
    }

    fn from_file(self, path: &str, mode: SelectionMode) -> anyhow::Result<PassResult> {
        match self {
            InputFormat::Overpass => orient_overpass_file(path, mode),
            InputFormat::GeoJson => orient_geojson_file(path, mode),
        }
    }

    fn from_data(self, data: serde_json::Value, mode: SelectionMode) -> anyhow::Result<PassResult> {
        match (self, data) {
            (InputFormat::Overpass, serde_json::Value::String(text)) => orient_overpass_str(&text, mode),
            (InputFormat::Overpass, value) => orient_overpass_value(value, mode),
            (InputFormat::GeoJson, serde_json::Value::String(text)) => orient_geojson_str(&text, mode),
            (InputFormat::GeoJson, value) => orient_geojson_value(value, mode),
        }
    }
}

fn load(
    session: &mut Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
    format: InputFormat,
) -> Response {
    let params: LoadParams = match parse_params(&id, params, "{file_path: string} or {data}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    let mode = session.selection_mode();
    let (source, outcome) = match (params.file_path, params.data) {
        (Some(path), None) => {
            log::info!("Loading {} file: {}", format.label(), path);
            let outcome = format.from_file(&path, mode);
            (path, outcome)
        }
        (None, Some(data)) => {
            log::info!("Loading inline {} data", format.label());
            (format!("inline {} data", format.label()), format.from_data(data, mode))
        }
        _ => {
            return Response::error(id, error_codes::INVALID_PARAMS,
                "Invalid params: expected exactly one of file_path or data".to_string());
        }
    };

    match outcome {
        Ok(result) => {
            session.replace_rows(source.clone(), result);
            let stats = session.last_stats.clone();
            Response::success(id, serde_json::json!({
                "status": "ok",
                "source": source,
                "row_count": session.rows.len(),
                "message": session.status.message,
                "stats": stats,
            }))
        }
        Err(e) => {
            let message = format!("Failed to load {}: {:#}", format.label(), e);
            log::warn!("{}", message);
            session.record_failure(message.clone());
            Response::error(id, error_codes::PARSE_FAILED, message)
        }
    }
}

/// Handle LoadOverpass request - converts an Overpass response and replaces the rows
pub fn handle_load_overpass(
    session: &mut Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    load(session, id, params, InputFormat::Overpass)
}

/// Handle ImportGeoJson request - imports a FeatureCollection and replaces the rows
pub fn handle_import_geojson(
    session: &mut Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    load(session, id, params, InputFormat::GeoJson)
}

/// Handle Close request - drops rows and selection
pub fn handle_close(session: &mut Session, id: Option<serde_json::Value>) -> Response {
    let dropped = session.rows.len();
    session.clear();
    log::info!("Session closed ({} rows dropped)", dropped);
    Response::success(id, serde_json::json!({ "status": "ok" }))
}
