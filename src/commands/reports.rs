// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::aggregate;
use crate::models::{BucketSummary, DateRange, GrandTotals, PeriodMode, Report, SortOrder};
use crate::source::load_records;
use crate::utils::{fmt_money, get_currency, maybe_print_json, pretty_table, selection_from};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use tracing::warn;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (mode, range) = selection_from(sub)?;
    let report = build_report(conn, mode, range, Utc::now().date_naive())?;

    if json_flag {
        maybe_print_json(true, false, &report)?;
        return Ok(());
    }
    if maybe_print_json(false, jsonl_flag, &report.buckets)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    println!("{}", headline(&report.totals, &ccy));
    println!("{}", report_table(&report, &ccy));
    Ok(())
}

/// Load the records a selection covers and aggregate them. Records come
/// newest first, so each bucket's representative is its latest record.
pub fn build_report(
    conn: &Connection,
    mode: PeriodMode,
    range: Option<DateRange>,
    today: NaiveDate,
) -> Result<Report> {
    let records = load_records(conn, mode, SortOrder::Latest, today)?;
    let report = aggregate(&records, mode, range);
    if report.dropped > 0 {
        warn!(
            dropped = report.dropped,
            "skipped records with unreadable dates; run `salesboard doctor` for details"
        );
    }
    Ok(report)
}

pub fn headline(t: &GrandTotals, ccy: &str) -> String {
    format!(
        "Orders: {} | Items sold: {} | Revenue: {}",
        t.total_orders,
        t.total_items_sold,
        fmt_money(&t.total_revenue, ccy)
    )
}

fn bucket_row(b: &BucketSummary) -> Vec<String> {
    vec![
        b.label.clone(),
        b.date.to_string(),
        b.total_orders.to_string(),
        b.total_items_sold.to_string(),
        format!("{:.2}", b.total_revenue),
    ]
}

fn totals_row(t: &GrandTotals) -> Vec<String> {
    vec![
        "Total".into(),
        String::new(),
        t.total_orders.to_string(),
        t.total_items_sold.to_string(),
        format!("{:.2}", t.total_revenue),
    ]
}

pub fn report_table(report: &Report, ccy: &str) -> comfy_table::Table {
    let mut data: Vec<Vec<String>> = report.buckets.iter().map(bucket_row).collect();
    data.push(totals_row(&report.totals));
    let rev_hdr = format!("Revenue ({})", ccy);
    pretty_table(&["Period", "Date", "Orders", "Items Sold", &rev_hdr], data)
}
