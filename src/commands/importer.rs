// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::RawRecord;
use crate::source::upsert_record;
use crate::utils::parse_decimal;
use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("stats", sub)) => import_stats(conn, sub),
        _ => Ok(()),
    }
}

fn parse_count(raw: &str, field: &str, id: &str) -> Result<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u64>()
        .with_context(|| format!("Invalid {} '{}' for record {}", field, raw, id))
}

/// CSV columns: id,date,total_orders,total_items_sold,total_revenue
fn import_stats(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for result in rdr.records() {
        let rec = result?;
        let id = rec.get(0).context("id missing")?.trim().to_string();
        if id.is_empty() {
            bail!("Empty id on CSV line {}", count + 2);
        }
        // dates are stored verbatim; unreadable ones are dropped when reporting
        let date = rec.get(1).context("date missing")?.trim().to_string();
        let total_orders = parse_count(rec.get(2).unwrap_or(""), "total_orders", &id)?;
        let total_items_sold = parse_count(rec.get(3).unwrap_or(""), "total_items_sold", &id)?;
        let revenue_raw = rec.get(4).unwrap_or("").trim();
        let total_revenue = if revenue_raw.is_empty() {
            rust_decimal::Decimal::ZERO
        } else {
            parse_decimal(revenue_raw)
                .with_context(|| format!("Invalid total_revenue for record {}", id))?
        };
        if total_revenue.is_sign_negative() {
            bail!("Negative total_revenue '{}' for record {}", revenue_raw, id);
        }
        upsert_record(
            &tx,
            &RawRecord {
                id,
                date,
                total_orders,
                total_items_sold,
                total_revenue,
            },
        )?;
        count += 1;
    }
    tx.commit()?;
    info!(path, count, "imported daily statistics");
    println!("Imported {} records from {}", count, path);
    Ok(())
}
