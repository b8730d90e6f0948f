//! OSM tag bag with typed accessors for the keys the pipeline reads

use crate::geometry::EntranceKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display name used when no name tag is present
pub const UNNAMED: &str = "(no name)";

/// Name keys tried in order for the display name
pub const NAME_KEYS: [&str; 5] = ["name", "name:en", "name:it", "name:ja", "addr:housename"];

/// `building` values treated as churches (exact, case-insensitive)
pub const CHURCH_BUILDING_VALUES: [&str; 2] = ["church", "cathedral"];

/// Free-form `key=value` tags, insertion ordered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(IndexMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn building(&self) -> Option<&str> {
        self.get("building")
    }

    /// `building=church` or `building=cathedral`; `churchyard` and friends do not match
    pub fn is_church(&self) -> bool {
        self.building().is_some_and(|value| {
            CHURCH_BUILDING_VALUES
                .iter()
                .any(|church| value.eq_ignore_ascii_case(church))
        })
    }

    /// `type=multipolygon` on a relation
    pub fn is_multipolygon(&self) -> bool {
        self.get("type") == Some("multipolygon")
    }

    pub fn entrance_kind(&self) -> Option<EntranceKind> {
        self.get("entrance").and_then(EntranceKind::from_tag)
    }

    /// First non-empty name tag, or [`UNNAMED`]
    pub fn display_name(&self) -> String {
        NAME_KEYS
            .iter()
            .filter_map(|key| self.get(key))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(UNNAMED)
            .to_string()
    }

    /// Global id carried as a property (`@id` from osmtogeojson-style exports, or `id`)
    pub fn global_id(&self) -> Option<&str> {
        self.get("@id")
            .or_else(|| self.get("id"))
            .filter(|value| !value.trim().is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_church_exact_match() {
        assert!(Tags::from_iter([("building", "church")]).is_church());
        assert!(Tags::from_iter([("building", "Cathedral")]).is_church());
        assert!(!Tags::from_iter([("building", "churchyard")]).is_church());
        assert!(!Tags::from_iter([("building", "yes")]).is_church());
        assert!(!Tags::new().is_church());
    }

    #[test]
    fn test_display_name_fallback_chain() {
        assert_eq!(Tags::new().display_name(), UNNAMED);
        assert_eq!(
            Tags::from_iter([("name:it", "Duomo di Milano"), ("name:ja", "ミラノ大聖堂")]).display_name(),
            "Duomo di Milano"
        );
        assert_eq!(
            Tags::from_iter([("name", " "), ("name:en", "Milan Cathedral")]).display_name(),
            "Milan Cathedral"
        );
        assert_eq!(Tags::from_iter([("addr:housename", "Old Chapel")]).display_name(), "Old Chapel");
    }

    #[test]
    fn test_entrance_kind() {
        assert_eq!(Tags::from_iter([("entrance", "main")]).entrance_kind(), Some(EntranceKind::Main));
        assert_eq!(Tags::from_iter([("entrance", "yes")]).entrance_kind(), Some(EntranceKind::Yes));
        assert_eq!(Tags::from_iter([("entrance", "service")]).entrance_kind(), None);
    }

    #[test]
    fn test_deserialize_keeps_order() {
        let json = r#"{"name":"San Lorenzo","building":"church","denomination":"catholic"}"#;
        let tags: Tags = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "building", "denomination"]);
    }
}
