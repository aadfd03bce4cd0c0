use chrono::{DateTime, Datelike, Months, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One month of the creation histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct MonthCount {
    /// Three-letter month label (`"Jan"` .. `"Dec"`).
    pub month: String,
    pub count: u64,
}

/// Creation histogram over the trailing 12 months from `now`, sorted
/// chronologically. Months with no creations are omitted, matching the
/// grouped query this replaces.
pub fn monthly_histogram(created_at: &[DateTime<Utc>], now: DateTime<Utc>) -> Vec<MonthCount> {
    let cutoff = now - Months::new(12);
    let mut buckets: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for ts in created_at {
        if *ts >= cutoff {
            *buckets.entry((ts.year(), ts.month())).or_insert(0) += 1;
        }
    }
    buckets
        .into_iter()
        .map(|((_, month), count)| MonthCount {
            month: MONTH_ABBREV[(month - 1) as usize].to_string(),
            count,
        })
        .collect()
}
