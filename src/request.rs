//! Plot request validation.
//!
//! Turns the raw UI state (checked satellites, start/stop text) into a
//! validated PlotRequest, or a user-facing error. Host-agnostic: no UI
//! types appear here.

use crate::catalog::ObservatoryCatalog;
use crate::time::parse_user_time;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A validated request covering all selected satellites over one range.
/// Built fresh on each trigger and discarded once the fetch completes.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotRequest {
    pub satellite_ids: Vec<String>,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum RequestError {
    #[error("You must select at least one satellite")]
    NoSelection,
    #[error("Invalid Start Time")]
    InvalidStartTime,
    #[error("Invalid Stop Time")]
    InvalidStopTime,
    #[error("Start Time must be less than Stop Time")]
    InvalidRange,
    #[error("Time range outside of data for {name}.\n\nIt must be within {valid_window}.")]
    OutOfRange { name: String, valid_window: String },
}

/// Validates the selection and time range against the catalog.
///
/// Checks run in order and stop at the first failure: empty selection,
/// start parse, stop parse, ordering, then per-satellite window
/// containment in selection order. Window bounds are inclusive.
pub fn build_plot_request(
    catalog: &ObservatoryCatalog,
    selection: &[String],
    start_text: &str,
    stop_text: &str,
) -> Result<PlotRequest, RequestError> {
    if selection.is_empty() {
        return Err(RequestError::NoSelection);
    }

    let start = parse_user_time(start_text).ok_or(RequestError::InvalidStartTime)?;
    let stop = parse_user_time(stop_text).ok_or(RequestError::InvalidStopTime)?;

    if start >= stop {
        return Err(RequestError::InvalidRange);
    }

    for id in selection {
        // Selection comes from the catalog-backed list, so the lookup
        // only fails if the two fall out of sync.
        let record = catalog.get(id).ok_or_else(|| RequestError::OutOfRange {
            name: id.clone(),
            valid_window: String::from("(unknown)"),
        })?;
        if start < record.start_time || stop > record.end_time {
            return Err(RequestError::OutOfRange {
                name: record.name.clone(),
                valid_window: record.validity_window(),
            });
        }
    }

    Ok(PlotRequest {
        satellite_ids: selection.to_vec(),
        start,
        stop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ObservatoryRecord;
    use chrono::TimeZone;

    fn window(id: &str, name: &str, start: &str, end: &str) -> ObservatoryRecord {
        ObservatoryRecord {
            id: id.to_string(),
            name: name.to_string(),
            start_time: crate::time::parse_user_time(start).unwrap(),
            end_time: crate::time::parse_user_time(end).unwrap(),
        }
    }

    fn catalog() -> ObservatoryCatalog {
        ObservatoryCatalog::from_records(vec![window(
            "sat1",
            "Sat One",
            "2020-01-01",
            "2020-12-31",
        )])
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_selection_fails_before_time_parsing() {
        let err = build_plot_request(&catalog(), &[], "not-a-date", "also-bad");
        assert_eq!(err, Err(RequestError::NoSelection));
    }

    #[test]
    fn invalid_start_time() {
        let err = build_plot_request(&catalog(), &ids(&["sat1"]), "not-a-date", "2020-06-02");
        assert_eq!(err, Err(RequestError::InvalidStartTime));
    }

    #[test]
    fn invalid_stop_time() {
        let err = build_plot_request(&catalog(), &ids(&["sat1"]), "2020-06-01", "nope");
        assert_eq!(err, Err(RequestError::InvalidStopTime));
    }

    #[test]
    fn ordering_checked_before_windows() {
        // The range is reversed and also outside the window; ordering
        // must win.
        let err = build_plot_request(&catalog(), &ids(&["sat1"]), "2021-06-02", "2021-06-01");
        assert_eq!(err, Err(RequestError::InvalidRange));
    }

    #[test]
    fn equal_times_are_invalid() {
        let err = build_plot_request(&catalog(), &ids(&["sat1"]), "2020-06-01", "2020-06-01");
        assert_eq!(err, Err(RequestError::InvalidRange));
    }

    #[test]
    fn valid_range_inside_window() {
        let req = build_plot_request(&catalog(), &ids(&["sat1"]), "2020-06-01", "2020-06-02")
            .unwrap();
        assert_eq!(req.satellite_ids, ids(&["sat1"]));
        assert_eq!(req.start, Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(req.stop, Utc.with_ymd_and_hms(2020, 6, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let req = build_plot_request(&catalog(), &ids(&["sat1"]), "2020-01-01", "2020-12-31");
        assert!(req.is_ok());
    }

    #[test]
    fn range_outside_window_names_satellite() {
        let err = build_plot_request(&catalog(), &ids(&["sat1"]), "2021-01-01", "2021-01-02");
        assert_eq!(
            err,
            Err(RequestError::OutOfRange {
                name: "Sat One".to_string(),
                valid_window: "2020-01-01T00:00:00 to 2020-12-31T00:00:00".to_string(),
            })
        );
    }

    #[test]
    fn first_violation_in_selection_order_wins() {
        let catalog = ObservatoryCatalog::from_records(vec![
            window("early", "Early Sat", "2000-01-01", "2001-01-01"),
            window("late", "Late Sat", "2010-01-01", "2011-01-01"),
        ]);
        let err = build_plot_request(
            &catalog,
            &ids(&["late", "early"]),
            "2010-06-01",
            "2010-06-02",
        );
        // "late" passes, "early" is the first (and only) offender.
        assert_eq!(
            err,
            Err(RequestError::OutOfRange {
                name: "Early Sat".to_string(),
                valid_window: "2000-01-01T00:00:00 to 2001-01-01T00:00:00".to_string(),
            })
        );
    }

    #[test]
    fn selection_order_is_preserved_in_request() {
        let catalog = ObservatoryCatalog::from_records(vec![
            window("a", "A", "2000-01-01", "2030-01-01"),
            window("b", "B", "2000-01-01", "2030-01-01"),
        ]);
        let req =
            build_plot_request(&catalog, &ids(&["b", "a"]), "2020-06-01", "2020-06-02").unwrap();
        assert_eq!(req.satellite_ids, ids(&["b", "a"]));
    }
}
