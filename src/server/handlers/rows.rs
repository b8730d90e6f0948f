//! Row access: GetRows, Select, SetSelectionMode

use crate::geometry::LonLat;
use crate::reconcile::{OrientationRow, SelectionMode};
use crate::server::protocol::{error_codes, Response};
use crate::server::state::Session;
use crate::server::util::parse_params;
use serde::{Deserialize, Serialize};

/// A row as sent to clients, with its orientation arrow
#[derive(Serialize)]
struct RowView<'a> {
    #[serde(flatten)]
    row: &'a OrientationRow,
    arrow: [LonLat; 2],
}

fn no_data(id: Option<serde_json::Value>) -> Response {
    Response::error(
        id,
        error_codes::NO_DATA_LOADED,
        "No data loaded. Call LoadOverpass or ImportGeoJson first.".to_string(),
    )
}

/// Handle GetRows request - returns every row with its arrow
pub fn handle_get_rows(session: &Session, id: Option<serde_json::Value>) -> Response {
    if !session.is_loaded() {
        return no_data(id);
    }

    let arrow_length = session.config.arrow_length_m;
    let rows: Vec<RowView> = session
        .rows
        .iter()
        .map(|row| RowView { row, arrow: row.arrow(arrow_length) })
        .collect();

    match serde_json::to_value(&rows) {
        Ok(rows) => Response::success(id, serde_json::json!({
            "rows": rows,
            "selected_id": session.selected_id,
            "selection_mode": session.selection_mode(),
        })),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, format!("Failed to serialize rows: {}", e)),
    }
}

/// Handle Select request - selects a row by id and returns it
pub fn handle_select(
    session: &mut Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct SelectParams {
        id: String,
    }

    let params: SelectParams = match parse_params(&id, params, "{id: string}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    if !session.is_loaded() {
        return no_data(id);
    }
    if !session.select(&params.id) {
        return Response::error(id, error_codes::ROW_NOT_FOUND, format!("Row not found: {}", params.id));
    }

    let Some(row) = session.selected_row() else {
        return Response::error(id, error_codes::ROW_NOT_FOUND, format!("Row not found: {}", params.id));
    };
    let view = RowView { row, arrow: row.arrow(session.config.arrow_length_m) };
    match serde_json::to_value(&view) {
        Ok(row) => Response::success(id, serde_json::json!({ "row": row })),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, format!("Failed to serialize row: {}", e)),
    }
}

/// Handle SetSelectionMode request - re-picks orientation for the current rows
pub fn handle_set_selection_mode(
    session: &mut Session,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct ModeParams {
        mode: SelectionMode,
    }

    let params: ModeParams = match parse_params(&id, params, "{mode: \"altar\" | \"entrance\" | \"pca\"}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    session.set_selection_mode(params.mode);
    log::info!("Selection mode set to {:?} ({} rows updated)", params.mode, session.rows.len());

    Response::success(id, serde_json::json!({
        "status": "ok",
        "mode": params.mode,
        "row_count": session.rows.len(),
    }))
}
