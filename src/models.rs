// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One day of order statistics as supplied by the upstream source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub id: String,
    pub date: String, // raw upstream text, parsed on demand
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_items_sold: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub id: String,
    pub label: String,
    pub date: NaiveDate,
    pub total_orders: u64,
    pub total_items_sold: u64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotals {
    pub total_orders: u64,
    pub total_items_sold: u64,
    pub total_revenue: Decimal,
}

impl GrandTotals {
    /// Accumulate one row of metrics. Counts saturate at `u64::MAX` and
    /// revenue clamps at the `Decimal` bounds instead of overflowing.
    pub fn add(&mut self, orders: u64, items_sold: u64, revenue: Decimal) {
        self.total_orders = self.total_orders.saturating_add(orders);
        self.total_items_sold = self.total_items_sold.saturating_add(items_sold);
        self.total_revenue = self.total_revenue.checked_add(revenue).unwrap_or(
            if revenue.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            },
        );
    }

    pub fn add_summary(&mut self, b: &BucketSummary) {
        self.add(b.total_orders, b.total_items_sold, b.total_revenue);
    }

    pub fn add_record(&mut self, r: &RawRecord) {
        self.add(r.total_orders, r.total_items_sold, r.total_revenue);
    }

    /// Totals straight from raw records, bypassing bucketing.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut t = GrandTotals::default();
        for r in records {
            t.add_record(r);
        }
        t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Custom,
}

impl PeriodMode {
    pub const ALL: [&'static str; 6] = ["day", "week", "month", "quarter", "year", "custom"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodMode::Day => "day",
            PeriodMode::Week => "week",
            PeriodMode::Month => "month",
            PeriodMode::Quarter => "quarter",
            PeriodMode::Year => "year",
            PeriodMode::Custom => "custom",
        }
    }
}

impl fmt::Display for PeriodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid period '{0}', expected one of day|week|month|quarter|year|custom")]
pub struct ParsePeriodError(pub String);

impl FromStr for PeriodMode {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(PeriodMode::Day),
            "week" => Ok(PeriodMode::Week),
            "month" => Ok(PeriodMode::Month),
            "quarter" => Ok(PeriodMode::Quarter),
            "year" => Ok(PeriodMode::Year),
            "custom" => Ok(PeriodMode::Custom),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

/// Inclusive calendar-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.start <= d && d <= self.end
    }
}

/// Output of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub buckets: Vec<BucketSummary>,
    pub totals: GrandTotals,
    /// Records skipped because their date could not be read.
    pub dropped: usize,
}

/// Order in which stored records are handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Latest,
    Oldest,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid sort '{0}', expected latest|oldest")]
pub struct ParseSortError(pub String);

impl FromStr for SortOrder {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest" => Ok(SortOrder::Latest),
            "oldest" => Ok(SortOrder::Oldest),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}
