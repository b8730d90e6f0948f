//! Export operations: ExportCsv, ExportGeoJson

use crate::export::{export_csv_file, export_geojson_file, rows_to_csv, rows_to_geojson};
use crate::reconcile::OrientationRow;
use crate::server::protocol::{error_codes, Response};
use crate::server::state::Session;
use crate::server::util::parse_params;
use serde::Deserialize;

#[derive(Deserialize)]
struct ExportParams {
    #[serde(default)]
    file_path: Option<String>,
}

type FileWriter = fn(&[OrientationRow], &str) -> anyhow::Result<()>;
type TextWriter = fn(&[OrientationRow]) -> anyhow::Result<String>;

fn export(
    session: &Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
    to_file: FileWriter,
    to_text: TextWriter,
) -> Response {
    let params: ExportParams = match parse_params(&id, params, "{file_path?: string}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    if !session.is_loaded() {
        return Response::error(id, error_codes::NO_DATA_LOADED,
            "No data loaded. Nothing to export.".to_string());
    }

    match params.file_path {
        Some(path) => match to_file(&session.rows, &path) {
            Ok(()) => Response::success(id, serde_json::json!({
                "status": "ok",
                "file_path": path,
                "row_count": session.rows.len(),
            })),
            Err(e) => Response::error(id, error_codes::EXPORT_FAILED, format!("Export failed: {:#}", e)),
        },
        None => match to_text(&session.rows) {
            Ok(content) => Response::success(id, serde_json::json!({
                "status": "ok",
                "content": content,
                "row_count": session.rows.len(),
            })),
            Err(e) => Response::error(id, error_codes::EXPORT_FAILED, format!("Export failed: {:#}", e)),
        },
    }
}

/// Handle ExportCsv request - writes to `file_path` or returns the CSV text
pub fn handle_export_csv(
    session: &Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    export(session, id, params, |rows, path| export_csv_file(rows, path), rows_to_csv)
}

/// Handle ExportGeoJson request - writes to `file_path` or returns the GeoJSON text
pub fn handle_export_geojson(
    session: &Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    export(session, id, params, |rows, path| export_geojson_file(rows, path), rows_to_geojson)
}
