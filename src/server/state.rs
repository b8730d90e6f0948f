//! Session state for the orientation server

use crate::config::OrientationConfig;
use crate::parsing::ConversionStats;
use crate::pipeline::PassResult;
use crate::reconcile::{OrientationRow, SelectionMode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// Last user-visible status line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub level: StatusLevel,
    pub message: String,
}

impl SessionStatus {
    fn info(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, message: message.into() }
    }
}

/// Everything one client works on: the current row set and its settings.
///
/// Rows are only ever replaced as a whole, so a failed load leaves the
/// previous rows untouched.
pub struct Session {
    /// File path or description of the data the rows came from
    pub source: Option<String>,
    pub rows: Vec<OrientationRow>,
    pub selected_id: Option<String>,
    pub config: OrientationConfig,
    pub last_stats: Option<ConversionStats>,
    pub status: SessionStatus,
}

impl Session {
    pub fn new(config: OrientationConfig) -> Self {
        Self {
            source: None,
            rows: Vec::new(),
            selected_id: None,
            config,
            last_stats: None,
            status: SessionStatus::info("Ready"),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.config.selection_mode
    }

    /// Swap in the rows of a finished pass. The selection survives when its id still exists.
    pub fn replace_rows(&mut self, source: String, result: PassResult) {
        let summary = result.summary();
        self.rows = result.rows;
        self.last_stats = Some(result.stats);
        self.source = Some(source);
        if let Some(selected) = &self.selected_id {
            if !self.rows.iter().any(|row| &row.id == selected) {
                self.selected_id = None;
            }
        }
        self.status = SessionStatus { level: StatusLevel::Success, message: summary };
    }

    /// Note a failed operation; rows and selection stay as they were
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.status = SessionStatus { level: StatusLevel::Error, message: message.into() };
    }

    /// Re-pick orientation and deviation for every row; geometry and signals are kept
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        self.rows = self.rows.iter().map(|row| row.with_mode(mode)).collect();
    }

    pub fn find_row(&self, id: &str) -> Option<&OrientationRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn selected_row(&self) -> Option<&OrientationRow> {
        self.selected_id.as_deref().and_then(|id| self.find_row(id))
    }

    /// Select a row by id; unknown ids leave the selection unchanged
    pub fn select(&mut self, id: &str) -> bool {
        if self.find_row(id).is_some() {
            self.selected_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Drop all data; the config is kept
    pub fn clear(&mut self) {
        self.source = None;
        self.rows.clear();
        self.selected_id = None;
        self.last_stats = None;
        self.status = SessionStatus::info("Closed");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(OrientationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::orient_overpass_str;

    const SQUARE: &str = r#"{"elements":[
        {"type":"node","id":1,"lon":9.0,"lat":45.0},
        {"type":"node","id":2,"lon":9.001,"lat":45.0},
        {"type":"node","id":3,"lon":9.001,"lat":45.0005},
        {"type":"node","id":4,"lon":9.0,"lat":45.0005},
        {"type":"node","id":5,"lon":9.0005,"lat":45.0,"tags":{"entrance":"main"}},
        {"type":"way","id":10,"nodes":[1,2,3,4,1],"tags":{"building":"church","name":"San Marco"}}
    ]}"#;

    fn loaded() -> Session {
        let mut session = Session::default();
        let result = orient_overpass_str(SQUARE, session.selection_mode()).unwrap();
        session.replace_rows("inline".to_string(), result);
        session
    }

    #[test]
    fn test_replace_and_select() {
        let mut session = loaded();
        assert!(session.is_loaded());
        assert_eq!(session.rows.len(), 1);
        assert_eq!(session.status.message, "1 buildings");
        assert!(session.select("way/10"));
        assert!(!session.select("way/11"));
        assert_eq!(session.selected_row().map(|r| r.name.as_str()), Some("San Marco"));
    }

    #[test]
    fn test_failure_keeps_rows() {
        let mut session = loaded();
        session.record_failure("Failed to parse");
        assert_eq!(session.rows.len(), 1);
        assert_eq!(session.status.level, StatusLevel::Error);
    }

    #[test]
    fn test_selection_mode_recomputes() {
        let mut session = loaded();
        // entrance on the south edge: entrance 180, altar due north
        let altar = session.rows[0].orientation_deg;
        assert!(altar < 1e-6 || 360.0 - altar < 1e-6, "altar {}", altar);
        let geometry = session.rows[0].geometry.clone();

        session.set_selection_mode(SelectionMode::Entrance);
        assert!((session.rows[0].orientation_deg - 180.0).abs() < 1e-6);
        assert!((session.rows[0].deviation_deg - 90.0).abs() < 1e-6);
        assert_eq!(session.rows[0].geometry, geometry);
    }

    #[test]
    fn test_clear() {
        let mut session = loaded();
        session.select("way/10");
        session.clear();
        assert!(!session.is_loaded());
        assert!(session.rows.is_empty());
        assert_eq!(session.selected_id, None);
    }
}
