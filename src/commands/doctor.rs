// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::parse_record_date;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Problems that would make a stored record drop out of, or skew, a report.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut stmt = conn.prepare(
        "SELECT id, date, total_orders, total_items_sold, total_revenue
         FROM statistics ORDER BY date, id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let date: String = r.get(1)?;
        let orders: i64 = r.get(2)?;
        let items: i64 = r.get(3)?;
        let revenue: String = r.get(4)?;

        // 1) Dates the report step cannot read
        if parse_record_date(&date).is_none() {
            rows.push(vec!["unreadable_date".into(), format!("{} '{}'", id, date)]);
        }
        // 2) Metrics outside their domain
        if orders < 0 || items < 0 {
            rows.push(vec![
                "negative_count".into(),
                format!("{} orders={} items={}", id, orders, items),
            ]);
        }
        match revenue.trim().parse::<Decimal>() {
            Ok(d) if d.is_sign_negative() => {
                rows.push(vec!["negative_revenue".into(), format!("{} {}", id, d)]);
            }
            Ok(_) => {}
            Err(_) => {
                rows.push(vec!["invalid_revenue".into(), format!("{} '{}'", id, revenue)]);
            }
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
