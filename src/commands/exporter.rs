// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::build_report;
use crate::models::BucketSummary;
use crate::utils::selection_from;
use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::Connection;
use std::io::Write;
use tracing::info;

pub const EXPORT_HEADER: [&str; 4] = ["Date/Label", "TotalOrders", "TotalItemsSold", "TotalRevenue"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(conn, sub),
        _ => Ok(()),
    }
}

/// Write bucket rows as CSV, header first.
pub fn write_csv<W: Write>(out: W, buckets: &[BucketSummary]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(EXPORT_HEADER)?;
    for b in buckets {
        wtr.write_record([
            b.label.clone(),
            b.total_orders.to_string(),
            b.total_items_sold.to_string(),
            b.total_revenue.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn export_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let (mode, range) = selection_from(sub)?;
    let report = build_report(conn, mode, range, Utc::now().date_naive())?;

    match fmt.as_str() {
        "csv" => {
            let file =
                std::fs::File::create(out).with_context(|| format!("Create {}", out))?;
            write_csv(file, &report.buckets)?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&report.buckets)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    info!(out, rows = report.buckets.len(), "exported report");
    println!("Exported {} {} rows to {}", report.buckets.len(), mode, out);
    Ok(())
}
