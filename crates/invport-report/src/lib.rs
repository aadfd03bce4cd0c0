//! Aggregation and report shaping for the inventory portal.
//!
//! Everything in this crate is pure: time-relative computations (warranty
//! buckets, asset age, the alerts feed, the monthly histogram) take an
//! explicit `now` instead of reading the wall clock, so the same inputs
//! always produce the same report. Handlers fetch rows from the store, pass
//! them through these functions, and serialize the result.

pub mod alerts;
pub mod buckets;
pub mod cost;
pub mod csv;
pub mod error;
pub mod monthly;
pub mod pdf;

use invport_common::types::ItemStatus;
use std::collections::HashMap;

pub use error::{ReportError, Result};

/// Zero-filled per-status counts: every one of the five statuses appears,
/// even with no matching items, and the values sum to the total item count.
pub fn status_breakdown(rows: &[(String, i64)]) -> HashMap<String, i64> {
    let mut counts: HashMap<String, i64> = ItemStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for (status, count) in rows {
        // Unknown stored statuses are carried through rather than dropped.
        *counts.entry(status.clone()).or_insert(0) += count;
    }
    counts
}

/// Per-building counts keyed by building name. Input order (descending by
/// count) comes from the store query.
pub fn building_breakdown(rows: &[(String, i64)]) -> HashMap<String, i64> {
    rows.iter().cloned().collect()
}

/// Per-floor counts keyed `"<building> - Floor <floor>"`.
pub fn floor_breakdown(rows: &[(String, String, i64)]) -> HashMap<String, i64> {
    rows.iter()
        .map(|(building, floor, count)| (format!("{building} - Floor {floor}"), *count))
        .collect()
}
