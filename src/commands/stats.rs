// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{RawRecord, SortOrder};
use crate::source::{all_records, delete_record, get_records, load_records, upsert_record};
use crate::utils::{get_currency, maybe_print_json, parse_decimal, parse_period, pretty_table};
use anyhow::{Result, bail};
use chrono::Utc;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let date = sub.get_one::<String>("date").map(|d| d.trim());
            let n = delete_record(conn, id, date)?;
            match (n, date) {
                (0, Some(d)) => bail!("Record '{}' on {} not found", id, d),
                (0, None) => bail!("Record '{}' not found", id),
                _ => println!("Removed {} record(s) for '{}'", n, id),
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    if id.is_empty() {
        bail!("Record id must not be empty");
    }
    let rec = RawRecord {
        id,
        date: sub.get_one::<String>("date").unwrap().trim().to_string(),
        total_orders: *sub.get_one::<u64>("orders").unwrap_or(&0),
        total_items_sold: *sub.get_one::<u64>("items").unwrap_or(&0),
        total_revenue: parse_decimal(sub.get_one::<String>("revenue").unwrap())?,
    };
    if rec.total_revenue.is_sign_negative() {
        bail!("Revenue must not be negative");
    }
    upsert_record(conn, &rec)?;
    println!("Saved record '{}' for {}", rec.id, rec.date);
    Ok(())
}

fn record_row(r: &RawRecord) -> Vec<String> {
    vec![
        r.id.clone(),
        r.date.clone(),
        r.total_orders.to_string(),
        r.total_items_sold.to_string(),
        format!("{:.2}", r.total_revenue),
    ]
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let order = sub
        .get_one::<String>("sort")
        .map(|s| s.parse::<SortOrder>())
        .transpose()?
        .unwrap_or_default();
    let mode = sub
        .get_one::<String>("period")
        .map(String::as_str)
        .map(parse_period)
        .transpose()?;
    let today = Utc::now().date_naive();
    let records = match mode {
        Some(mode) => load_records(conn, mode, order, today)?,
        None => all_records(conn, order)?,
    };
    if !maybe_print_json(json_flag, jsonl_flag, &records)? {
        let ccy = get_currency(conn)?;
        let rev_hdr = format!("Revenue ({})", ccy);
        let data = records.iter().map(record_row).collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Orders", "Items Sold", &rev_hdr], data)
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let recs = get_records(conn, id)?;
    if recs.is_empty() {
        bail!("Record '{}' not found", id);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &recs)? {
        let ccy = get_currency(conn)?;
        let rev_hdr = format!("Revenue ({})", ccy);
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Orders", "Items Sold", &rev_hdr],
                recs.iter().map(record_row).collect()
            )
        );
    }
    Ok(())
}
