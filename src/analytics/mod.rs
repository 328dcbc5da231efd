// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Re-bucketing of daily order statistics into reporting periods.
//!
//! Every function here is pure: inputs are borrowed, never mutated, and each
//! call recomputes its output from scratch.

pub mod aggregate;
pub mod bucket;

pub use aggregate::{grand_totals, group_records, summarize};
pub use bucket::{bucket_key, derive_key, week_of_month};

use crate::models::{DateRange, PeriodMode, RawRecord, Report};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Calendar day of an upstream date string, time-of-day ignored.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// forms. The day is taken as written; no timezone shifting is applied.
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

pub fn record_date(record: &RawRecord) -> Option<NaiveDate> {
    parse_record_date(&record.date)
}

/// Records with a readable date, in input order, plus how many were skipped.
pub fn readable_records(records: &[RawRecord]) -> (Vec<&RawRecord>, usize) {
    let mut out = Vec::with_capacity(records.len());
    let mut dropped = 0;
    for r in records {
        if record_date(r).is_some() {
            out.push(r);
        } else {
            debug!(id = %r.id, date = %r.date, "dropping record with unreadable date");
            dropped += 1;
        }
    }
    (out, dropped)
}

/// Records whose day falls inside `range`, both ends inclusive. Unreadable
/// dates never match and an inverted range yields nothing.
pub fn filter_range<'a, I>(records: I, range: &DateRange) -> Vec<&'a RawRecord>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    records
        .into_iter()
        .filter(|r| record_date(r).is_some_and(|d| range.contains(d)))
        .collect()
}

/// Run the whole pipeline: date checks, custom-range narrowing, bucketing,
/// per-bucket sums and grand totals.
///
/// `range` only applies in `custom` mode; other modes expect the source to
/// have scoped the records already.
pub fn aggregate(records: &[RawRecord], mode: PeriodMode, range: Option<DateRange>) -> Report {
    let (readable, dropped) = readable_records(records);
    let selected = match (mode, range) {
        (PeriodMode::Custom, Some(range)) => filter_range(readable, &range),
        _ => readable,
    };
    let buckets = summarize(group_records(selected, mode));
    let totals = grand_totals(&buckets);
    debug!(
        mode = %mode,
        input = records.len(),
        dropped,
        buckets = buckets.len(),
        "aggregated sales statistics"
    );
    Report {
        buckets,
        totals,
        dropped,
    }
}
