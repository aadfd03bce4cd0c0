use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;

/// Warranty state buckets over all items with a non-null expiry date.
///
/// Intervals are half-open (lower-inclusive, upper-exclusive) against the
/// injected `now`, so every dated item lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyBuckets {
    /// `expiry < now`
    pub expired: u64,
    /// `now <= expiry < now + 30d`
    pub expiring_soon: u64,
    /// `now + 30d <= expiry < now + 60d`
    pub expiring_next_30_days: u64,
    /// `expiry >= now + 60d`
    pub valid_warranty: u64,
}

pub fn warranty_buckets(expiries: &[DateTime<Utc>], now: DateTime<Utc>) -> WarrantyBuckets {
    let in_30 = now + Duration::days(30);
    let in_60 = now + Duration::days(60);
    let mut buckets = WarrantyBuckets::default();
    for expiry in expiries {
        if *expiry < now {
            buckets.expired += 1;
        } else if *expiry < in_30 {
            buckets.expiring_soon += 1;
        } else if *expiry < in_60 {
            buckets.expiring_next_30_days += 1;
        } else {
            buckets.valid_warranty += 1;
        }
    }
    buckets
}

/// Asset age distribution over purchase dates, using the same half-open
/// interval logic at 1/2/3-year thresholds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgeDistribution {
    #[serde(rename = "lessThan1Year")]
    pub less_than_1_year: u64,
    pub one_to_two_years: u64,
    pub two_to_three_years: u64,
    pub more_than_three_years: u64,
}

pub fn age_distribution(purchase_dates: &[DateTime<Utc>], now: DateTime<Utc>) -> AgeDistribution {
    // Calendar years, matching how the thresholds read ("one year ago"),
    // not fixed 365-day spans.
    let one_year_ago = now - Months::new(12);
    let two_years_ago = now - Months::new(24);
    let three_years_ago = now - Months::new(36);
    let mut dist = AgeDistribution::default();
    for purchased in purchase_dates {
        if *purchased >= one_year_ago {
            dist.less_than_1_year += 1;
        } else if *purchased >= two_years_ago {
            dist.one_to_two_years += 1;
        } else if *purchased >= three_years_ago {
            dist.two_to_three_years += 1;
        } else {
            dist.more_than_three_years += 1;
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn warranty_buckets_are_exclusive_and_exhaustive() {
        let now = fixed_now();
        let expiries = vec![
            now - Duration::days(1),  // expired
            now,                      // lower bound of expiring_soon
            now + Duration::days(29), // expiring_soon
            now + Duration::days(30), // lower bound of next-30
            now + Duration::days(59), // next-30
            now + Duration::days(60), // valid
            now + Duration::days(400),
        ];
        let buckets = warranty_buckets(&expiries, now);
        assert_eq!(buckets.expired, 1);
        assert_eq!(buckets.expiring_soon, 2);
        assert_eq!(buckets.expiring_next_30_days, 2);
        assert_eq!(buckets.valid_warranty, 2);
        let total = buckets.expired
            + buckets.expiring_soon
            + buckets.expiring_next_30_days
            + buckets.valid_warranty;
        assert_eq!(total as usize, expiries.len());
    }

    #[test]
    fn warranty_buckets_deterministic_for_fixed_now() {
        let now = fixed_now();
        let expiries = vec![now + Duration::days(10)];
        assert_eq!(
            warranty_buckets(&expiries, now),
            warranty_buckets(&expiries, now)
        );
    }

    #[test]
    fn age_distribution_thresholds() {
        let now = fixed_now();
        let dates = vec![
            now - Duration::days(30),    // <1y
            now - Months::new(12),       // exactly 1y ago: still <1y (lower-inclusive)
            now - Months::new(18),       // 1-2y
            now - Months::new(30),       // 2-3y
            now - Months::new(48),       // >3y
        ];
        let dist = age_distribution(&dates, now);
        assert_eq!(dist.less_than_1_year, 2);
        assert_eq!(dist.one_to_two_years, 1);
        assert_eq!(dist.two_to_three_years, 1);
        assert_eq!(dist.more_than_three_years, 1);
    }
}
