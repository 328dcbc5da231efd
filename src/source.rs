// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::parse_record_date;
use crate::models::{PeriodMode, RawRecord, SortOrder};
use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

/// First day a coarse period selection covers, relative to `today`.
///
/// `week` starts on the Monday of the current week, `month` on the 1st of the
/// current month and `year` on January 1st. Other modes are not scoped.
pub fn period_start(mode: PeriodMode, today: NaiveDate) -> Option<NaiveDate> {
    match mode {
        PeriodMode::Week => {
            Some(today - Duration::days(today.weekday().num_days_from_monday() as i64))
        }
        PeriodMode::Month => today.with_day(1),
        PeriodMode::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
        PeriodMode::Day | PeriodMode::Quarter | PeriodMode::Custom => None,
    }
}

type Row = (String, String, i64, i64, String);

fn row_to_record(row: Row) -> Result<RawRecord> {
    let (id, date, orders, items, revenue) = row;
    let total_orders = u64::try_from(orders)
        .with_context(|| format!("Negative total_orders {} on record {}", orders, id))?;
    let total_items_sold = u64::try_from(items)
        .with_context(|| format!("Negative total_items_sold {} on record {}", items, id))?;
    let total_revenue = revenue
        .trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid total_revenue '{}' on record {}", revenue, id))?;
    Ok(RawRecord {
        id,
        date,
        total_orders,
        total_items_sold,
        total_revenue,
    })
}

fn metric_to_sql(v: u64, what: &str) -> Result<i64> {
    i64::try_from(v).with_context(|| format!("{} {} is out of range", what, v))
}

/// All stored records in the requested order. Ties on date fall back to id so
/// the order is stable between runs.
pub fn all_records(conn: &Connection, order: SortOrder) -> Result<Vec<RawRecord>> {
    let sql = match order {
        SortOrder::Latest => {
            "SELECT id, date, total_orders, total_items_sold, total_revenue
             FROM statistics ORDER BY date DESC, id"
        }
        SortOrder::Oldest => {
            "SELECT id, date, total_orders, total_items_sold, total_revenue
             FROM statistics ORDER BY date ASC, id"
        }
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row_to_record(row?)?);
    }
    Ok(out)
}

/// Raw records for a period selection, scoped the way the statistics API
/// scopes them. Records with unreadable dates are kept; the aggregation step
/// drops and counts them.
pub fn load_records(
    conn: &Connection,
    mode: PeriodMode,
    order: SortOrder,
    today: NaiveDate,
) -> Result<Vec<RawRecord>> {
    let mut records = all_records(conn, order)?;
    if let Some(start) = period_start(mode, today) {
        records.retain(|r| parse_record_date(&r.date).is_none_or(|d| d >= start));
    }
    Ok(records)
}

/// Every stored day for one id, oldest first.
pub fn get_records(conn: &Connection, id: &str) -> Result<Vec<RawRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, total_orders, total_items_sold, total_revenue
         FROM statistics WHERE id=?1 ORDER BY date",
    )?;
    let rows = stmt.query_map(params![id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row_to_record(row?)?);
    }
    Ok(out)
}

/// Insert or replace the row for `(id, date)`. Returns `true` when a new row
/// was created.
pub fn upsert_record(conn: &Connection, rec: &RawRecord) -> Result<bool> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM statistics WHERE id=?1 AND date=?2",
            params![rec.id, rec.date],
            |r| r.get(0),
        )
        .optional()?;
    conn.execute(
        "INSERT INTO statistics(id, date, total_orders, total_items_sold, total_revenue)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id, date) DO UPDATE SET
            total_orders=excluded.total_orders,
            total_items_sold=excluded.total_items_sold,
            total_revenue=excluded.total_revenue",
        params![
            rec.id,
            rec.date,
            metric_to_sql(rec.total_orders, "total_orders")?,
            metric_to_sql(rec.total_items_sold, "total_items_sold")?,
            rec.total_revenue.to_string()
        ],
    )
    .with_context(|| format!("Save record {} on {}", rec.id, rec.date))?;
    Ok(exists.is_none())
}

/// Delete every row for `id`, or only the one on `date` when given.
pub fn delete_record(conn: &Connection, id: &str, date: Option<&str>) -> Result<usize> {
    let n = match date {
        Some(d) => conn.execute(
            "DELETE FROM statistics WHERE id=?1 AND date=?2",
            params![id, d],
        )?,
        None => conn.execute("DELETE FROM statistics WHERE id=?1", params![id])?,
    };
    Ok(n)
}
