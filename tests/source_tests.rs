// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use salesboard::commands::{
    doctor,
    reports::{build_report, headline, report_table},
};
use salesboard::models::{DateRange, PeriodMode, RawRecord, SortOrder};
use salesboard::source::{
    all_records, delete_record, get_records, load_records, period_start, upsert_record,
};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    salesboard::db::init_schema(&conn).unwrap();
    conn
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn put(conn: &Connection, id: &str, date: &str, orders: u64, revenue: &str) {
    upsert_record(
        conn,
        &RawRecord {
            id: id.into(),
            date: date.into(),
            total_orders: orders,
            total_items_sold: orders * 2,
            total_revenue: revenue.parse().unwrap(),
        },
    )
    .unwrap();
}

#[test]
fn period_start_matches_api_scoping() {
    // 2024-05-16 is a Thursday
    let today = ymd(2024, 5, 16);
    assert_eq!(period_start(PeriodMode::Week, today), Some(ymd(2024, 5, 13)));
    assert_eq!(period_start(PeriodMode::Month, today), Some(ymd(2024, 5, 1)));
    assert_eq!(period_start(PeriodMode::Year, today), Some(ymd(2024, 1, 1)));
    assert_eq!(period_start(PeriodMode::Quarter, today), None);
    assert_eq!(period_start(PeriodMode::Day, today), None);
    assert_eq!(period_start(PeriodMode::Custom, today), None);
    // Monday is its own week start
    assert_eq!(
        period_start(PeriodMode::Week, ymd(2024, 5, 13)),
        Some(ymd(2024, 5, 13))
    );
}

#[test]
fn same_id_on_different_days_keeps_both_rows() {
    let conn = setup();
    put(&conn, "s1", "2024-05-01", 3, "150.50");
    put(&conn, "s1", "2024-05-02", 4, "200");

    let recs = get_records(&conn, "s1").unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].date, "2024-05-01");
    assert_eq!(recs[0].total_revenue, "150.50".parse::<Decimal>().unwrap());
    assert_eq!(recs[1].date, "2024-05-02");
    assert_eq!(recs[1].total_orders, 4);
    assert_eq!(recs[1].total_items_sold, 8);
    assert_eq!(recs[1].total_revenue, Decimal::new(200, 0));
}

#[test]
fn upsert_replaces_only_the_matching_day() {
    let conn = setup();
    let fresh = upsert_record(
        &conn,
        &RawRecord {
            id: "s1".into(),
            date: "2024-05-01".into(),
            total_orders: 3,
            total_items_sold: 6,
            total_revenue: Decimal::new(30, 0),
        },
    )
    .unwrap();
    assert!(fresh);
    put(&conn, "s1", "2024-05-02", 4, "200");
    let replaced = upsert_record(
        &conn,
        &RawRecord {
            id: "s1".into(),
            date: "2024-05-01".into(),
            total_orders: 9,
            total_items_sold: 9,
            total_revenue: Decimal::new(90, 0),
        },
    )
    .unwrap();
    assert!(!replaced);

    let recs = get_records(&conn, "s1").unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].total_orders, 9);
    assert_eq!(recs[1].total_orders, 4);
}

#[test]
fn delete_by_id_or_single_day() {
    let conn = setup();
    put(&conn, "s1", "2024-05-01", 3, "150.50");
    put(&conn, "s1", "2024-05-02", 4, "200");
    put(&conn, "s2", "2024-05-02", 1, "10");

    assert_eq!(delete_record(&conn, "s1", Some("2024-05-01")).unwrap(), 1);
    assert_eq!(get_records(&conn, "s1").unwrap().len(), 1);
    assert_eq!(delete_record(&conn, "s1", Some("2024-05-01")).unwrap(), 0);

    assert_eq!(delete_record(&conn, "s1", None).unwrap(), 1);
    assert!(get_records(&conn, "s1").unwrap().is_empty());
    assert_eq!(delete_record(&conn, "s1", None).unwrap(), 0);
    assert_eq!(get_records(&conn, "s2").unwrap().len(), 1);
}

#[test]
fn records_come_back_in_requested_order() {
    let conn = setup();
    put(&conn, "b", "2024-02-01", 1, "1");
    put(&conn, "a", "2024-01-01", 1, "1");
    put(&conn, "c", "2024-03-01", 1, "1");

    let latest: Vec<String> = all_records(&conn, SortOrder::Latest)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(latest, ["c", "b", "a"]);

    let oldest: Vec<String> = all_records(&conn, SortOrder::Oldest)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(oldest, ["a", "b", "c"]);
}

#[test]
fn load_records_scopes_coarse_periods() {
    let conn = setup();
    put(&conn, "old", "2023-12-31", 1, "1");
    put(&conn, "jan", "2024-01-10", 1, "1");
    put(&conn, "may1", "2024-05-01T09:00:00Z", 1, "1");
    put(&conn, "mon", "2024-05-13", 1, "1");
    put(&conn, "bad", "unknown", 1, "1");
    let today = ymd(2024, 5, 16);

    let ids = |mode| -> Vec<String> {
        load_records(&conn, mode, SortOrder::Oldest, today)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect()
    };
    assert_eq!(ids(PeriodMode::Week), ["mon", "bad"]);
    assert_eq!(ids(PeriodMode::Month), ["may1", "mon", "bad"]);
    assert_eq!(ids(PeriodMode::Year), ["jan", "may1", "mon", "bad"]);
    assert_eq!(ids(PeriodMode::Quarter).len(), 5);
}

#[test]
fn build_report_uses_newest_record_as_representative() {
    let conn = setup();
    put(&conn, "d1", "2024-01-01", 5, "1000");
    put(&conn, "d2", "2024-01-05", 3, "500");
    put(&conn, "d3", "2024-02-01", 2, "200");
    put(&conn, "junk", "31/12/2023", 9, "9");

    let report = build_report(&conn, PeriodMode::Quarter, None, ymd(2024, 5, 16)).unwrap();
    let labels: Vec<&str> = report.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["Tuần 1 - 1/2024", "Tuần 1 - 2/2024"]);
    assert_eq!(report.buckets[0].id, "d2");
    assert_eq!(report.buckets[0].total_orders, 8);
    assert_eq!(report.totals.total_orders, 10);
    assert_eq!(report.dropped, 1);

    let range = DateRange::new(ymd(2024, 1, 2), ymd(2024, 1, 31));
    let custom = build_report(&conn, PeriodMode::Custom, Some(range), ymd(2024, 5, 16)).unwrap();
    assert_eq!(custom.buckets.len(), 1);
    assert_eq!(custom.buckets[0].label, "2024-01-05");
}

#[test]
fn doctor_flags_records_reports_would_skip() {
    let conn = setup();
    put(&conn, "ok", "2024-01-01", 1, "10");
    conn.execute(
        "INSERT INTO statistics(id, date, total_orders, total_items_sold, total_revenue)
         VALUES ('neg', '2024-01-02', -1, 0, '-5'), ('txt', 'yesterday', 0, 0, 'abc')",
        [],
    )
    .unwrap();

    let issues = doctor::find_issues(&conn).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(kinds.contains(&"negative_count"));
    assert!(kinds.contains(&"negative_revenue"));
    assert!(kinds.contains(&"unreadable_date"));
    assert!(kinds.contains(&"invalid_revenue"));
    assert!(issues.iter().all(|r| !r[1].starts_with("ok ")));
}

#[test]
fn negative_stored_counts_are_reported_as_errors() {
    let conn = setup();
    conn.execute(
        "INSERT INTO statistics(id, date, total_orders, total_items_sold, total_revenue)
         VALUES ('neg', '2024-01-02', -1, 0, '0')",
        [],
    )
    .unwrap();
    let err = all_records(&conn, SortOrder::Latest).unwrap_err();
    assert!(err.to_string().contains("neg"));
}

#[test]
fn report_table_ends_with_totals_row() {
    let conn = setup();
    put(&conn, "d1", "2024-01-01", 5, "1000");
    put(&conn, "d2", "2024-02-01", 2, "200.5");
    let report = build_report(&conn, PeriodMode::Day, None, ymd(2024, 5, 16)).unwrap();
    let rendered = report_table(&report, "VND").to_string();
    assert!(rendered.contains("Revenue (VND)"));
    assert!(rendered.contains("2024-02-01"));
    let total_line = rendered.lines().find(|l| l.contains("Total")).unwrap();
    assert!(total_line.contains("1200.50"));
    assert!(total_line.contains('7'));
    assert_eq!(
        headline(&report.totals, "VND"),
        "Orders: 7 | Items sold: 14 | Revenue: VND 1200.50"
    );
}
