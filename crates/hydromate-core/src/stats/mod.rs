//! Historical aggregation for the hydration chart.
//!
//! Buckets raw per-day hydration records into weekly, monthly or yearly
//! series relative to a reference date. Series length is fixed by the
//! range type, never by data sparsity: empty dates and months still get
//! a zero-sum bucket.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Day, Milliliters};

/// Chart range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRangeType {
    Weekly,
    Monthly,
    Yearly,
}

/// A single data point for chart rendering.
///
/// The core generates these -- the presentation layer just renders them.
/// For daily buckets the label is the date itself; for yearly buckets it
/// is the first of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub bucket: NaiveDate,
    pub total: Milliliters,
}

/// Cap on rows fetched per aggregation call.
///
/// A history dense enough to exceed this within one range under-reports;
/// the limitation is documented rather than silently wrong.
pub const RANGE_QUERY_LIMIT: usize = 1000;

/// The inclusive date window to fetch for `range` around `reference`.
///
/// - Weekly: the ISO week (Monday..Sunday) containing `reference`
/// - Monthly: first..last day of `reference`'s month
/// - Yearly: January 1st..`reference` (the data window; the output still
///   spans all twelve months)
pub fn range_bounds(range: DateRangeType, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    match range {
        DateRangeType::Weekly => {
            let monday =
                reference - Duration::days(i64::from(reference.weekday().num_days_from_monday()));
            (monday, monday + Duration::days(6))
        }
        DateRangeType::Monthly => {
            let first = reference.with_day(1).unwrap_or(reference);
            let last = (first + Months::new(1)) - Duration::days(1);
            (first, last)
        }
        DateRangeType::Yearly => {
            let jan_first = reference.with_month(1).and_then(|d| d.with_day(1)).unwrap_or(reference);
            (jan_first, reference)
        }
    }
}

/// Bucket `days` into the chart series for `range`.
///
/// `days` is expected to be the result of fetching [`range_bounds`];
/// records are summed into the bucket matching their calendar date
/// (weekly/monthly) or calendar month (yearly). Weekly series always
/// have 7 points, monthly one per day of the month, yearly exactly 12
/// month buckets regardless of how much of the year has elapsed.
pub fn aggregate(range: DateRangeType, reference: NaiveDate, days: &[Day]) -> Vec<ChartPoint> {
    let (start, end) = range_bounds(range, reference);
    match range {
        DateRangeType::Yearly => {
            let mut monthly: HashMap<NaiveDate, Milliliters> = HashMap::new();
            for day in days {
                let month_start = day.date.with_day(1).unwrap_or(day.date);
                let entry = monthly.entry(month_start).or_insert(Milliliters::ZERO);
                *entry += day.total();
            }
            (0..12)
                .map(|offset| {
                    let bucket = start + Months::new(offset);
                    ChartPoint {
                        bucket,
                        total: monthly.get(&bucket).copied().unwrap_or(Milliliters::ZERO),
                    }
                })
                .collect()
        }
        DateRangeType::Weekly | DateRangeType::Monthly => {
            let mut daily: HashMap<NaiveDate, Milliliters> = HashMap::new();
            for day in days {
                let entry = daily.entry(day.date).or_insert(Milliliters::ZERO);
                *entry += day.total();
            }
            let mut series = Vec::new();
            let mut current = start;
            while current <= end {
                series.push(ChartPoint {
                    bucket: current,
                    total: daily.get(&current).copied().unwrap_or(Milliliters::ZERO),
                });
                current += Duration::days(1);
            }
            series
        }
    }
}
