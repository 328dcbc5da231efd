// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PeriodMode, RawRecord};
use chrono::{Datelike, NaiveDate};

use super::record_date;

/// Week-within-month bucket: days 1-7 are week 1, 8-14 week 2, and so on.
/// Months longer than 28 days get a short fifth week.
pub fn week_of_month(date: NaiveDate) -> u32 {
    date.day().div_ceil(7)
}

/// Bucket label for a calendar day under the given period mode.
///
/// `day`, `week` and `custom` all bucket per calendar day (`YYYY-MM-DD`, so
/// lexicographic order matches chronological order). `month` and `quarter`
/// bucket by week-within-month and `year` buckets by calendar month.
pub fn bucket_key(date: NaiveDate, mode: PeriodMode) -> String {
    match mode {
        PeriodMode::Day | PeriodMode::Week | PeriodMode::Custom => {
            date.format("%Y-%m-%d").to_string()
        }
        PeriodMode::Month | PeriodMode::Quarter => format!(
            "Tuần {} - {}/{:04}",
            week_of_month(date),
            date.month(),
            date.year()
        ),
        PeriodMode::Year => format!("{}/{:04}", date.month(), date.year()),
    }
}

/// Label for a raw record, or `None` when its date cannot be read.
pub fn derive_key(record: &RawRecord, mode: PeriodMode) -> Option<String> {
    record_date(record).map(|d| bucket_key(d, mode))
}
