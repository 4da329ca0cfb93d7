//! Observatory catalog.
//!
//! Holds the descriptions of the satellites known to the SSC service,
//! built once at startup from the observatories fetch and read-only
//! afterwards. The catalog drives the selection list and time-range
//! validation.

use crate::time::format_window;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Ids pre-selected when the catalog loads, if present.
pub const DEFAULT_SELECTED: [&str; 2] = ["cluster1", "cluster2"];

#[derive(Clone, Debug, PartialEq)]
pub struct ObservatoryRecord {
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ObservatoryRecord {
    /// Validity window shown as the entry's hover text.
    pub fn validity_window(&self) -> String {
        format_window(self.start_time, self.end_time)
    }
}

/// Immutable id-keyed catalog with a name-sorted display order.
pub struct ObservatoryCatalog {
    records: HashMap<String, ObservatoryRecord>,
    display_order: Vec<String>,
}

impl ObservatoryCatalog {
    /// Builds the catalog from the fetched descriptions: sorts by name
    /// and collapses duplicate names (the service lists some platforms
    /// once per SPASE resource id), keeping the first id per name.
    pub fn from_records(mut records: Vec<ObservatoryRecord>) -> Self {
        records.sort_by(|a, b| a.name.cmp(&b.name));

        let mut map = HashMap::with_capacity(records.len());
        let mut display_order = Vec::with_capacity(records.len());
        let mut last_name: Option<String> = None;
        for record in records {
            if last_name.as_deref() == Some(record.name.as_str()) {
                continue;
            }
            last_name = Some(record.name.clone());
            display_order.push(record.id.clone());
            map.insert(record.id.clone(), record);
        }

        Self { records: map, display_order }
    }

    pub fn get(&self, id: &str) -> Option<&ObservatoryRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Records in display (name-sorted) order.
    pub fn iter_display(&self) -> impl Iterator<Item = &ObservatoryRecord> {
        self.display_order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Catalog fetch progress, polled from the update loop.
pub enum CatalogLoadState {
    Loading,
    Loaded(ObservatoryCatalog),
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, name: &str) -> ObservatoryRecord {
        ObservatoryRecord {
            id: id.to_string(),
            name: name.to_string(),
            start_time: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn display_order_is_name_sorted() {
        let catalog = ObservatoryCatalog::from_records(vec![
            record("wind", "Wind"),
            record("ace", "ACE"),
            record("themisa", "THEMIS-A"),
        ]);
        let names: Vec<&str> = catalog.iter_display().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["ACE", "THEMIS-A", "Wind"]);
    }

    #[test]
    fn duplicate_names_keep_first_id() {
        let catalog = ObservatoryCatalog::from_records(vec![
            record("mms1", "MMS-1"),
            record("mms1_spase", "MMS-1"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("mms1"));
        assert!(!catalog.contains("mms1_spase"));
    }

    #[test]
    fn lookup_by_id() {
        let catalog = ObservatoryCatalog::from_records(vec![record("ace", "ACE")]);
        assert_eq!(catalog.get("ace").map(|r| r.name.as_str()), Some("ACE"));
        assert_eq!(catalog.get("missing"), None);
    }

    #[test]
    fn validity_window_format() {
        let rec = record("ace", "ACE");
        assert_eq!(rec.validity_window(), "2000-01-01T00:00:00 to 2025-01-01T00:00:00");
    }
}
