// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use salesboard::{cli, commands::importer, source::get_records};
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    salesboard::db::init_schema(&conn).unwrap();
    conn
}

fn csv_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", body).unwrap();
    file.flush().unwrap();
    file
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["salesboard", "import", "stats", "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM statistics", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = base_conn();
    let file = csv_file(
        "id,date,total_orders,total_items_sold,total_revenue\n\
         s1,2024-01-01,5,10,1000\n\
         s2,2024-01-02T10:15:00Z,3,4,500.25\n",
    );
    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_import(&mut conn, &padded).unwrap();
    assert_eq!(count(&conn), 2);

    let s2 = get_records(&conn, "s2").unwrap().remove(0);
    assert_eq!(s2.date, "2024-01-02T10:15:00Z");
    assert_eq!(s2.total_items_sold, 4);
    assert_eq!(s2.total_revenue, "500.25".parse::<Decimal>().unwrap());
}

#[test]
fn importer_keeps_unreadable_dates_and_defaults_blank_metrics() {
    let mut conn = base_conn();
    let file = csv_file(
        "id,date,total_orders,total_items_sold,total_revenue\n\
         s1,someday,,,\n",
    );
    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();
    let s1 = get_records(&conn, "s1").unwrap().remove(0);
    assert_eq!(s1.date, "someday");
    assert_eq!(s1.total_orders, 0);
    assert_eq!(s1.total_revenue, Decimal::ZERO);
}

#[test]
fn importer_rolls_back_on_bad_number() {
    let mut conn = base_conn();
    let file = csv_file(
        "id,date,total_orders,total_items_sold,total_revenue\n\
         s1,2024-01-01,5,10,1000\n\
         s2,2024-01-02,-3,4,500\n",
    );
    let err = run_import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("total_orders"));
    assert_eq!(count(&conn), 0);
}

#[test]
fn importer_rejects_negative_revenue() {
    let mut conn = base_conn();
    let file = csv_file(
        "id,date,total_orders,total_items_sold,total_revenue\n\
         s1,2024-01-01,5,10,-1\n",
    );
    assert!(run_import(&mut conn, file.path().to_str().unwrap()).is_err());
    assert_eq!(count(&conn), 0);
}

#[test]
fn importer_replaces_existing_days() {
    let mut conn = base_conn();
    let first = csv_file("id,date,total_orders,total_items_sold,total_revenue\ns1,2024-01-01,1,1,1\n");
    let second = csv_file("id,date,total_orders,total_items_sold,total_revenue\ns1,2024-01-01,9,9,9\n");
    run_import(&mut conn, first.path().to_str().unwrap()).unwrap();
    run_import(&mut conn, second.path().to_str().unwrap()).unwrap();
    assert_eq!(count(&conn), 1);
    assert_eq!(get_records(&conn, "s1").unwrap()[0].total_orders, 9);
}

#[test]
fn importer_keeps_repeated_ids_on_different_days() {
    let mut conn = base_conn();
    let file = csv_file(
        "id,date,total_orders,total_items_sold,total_revenue\n\
         s1,2024-01-01,5,5,50\n\
         s1,2024-01-02,3,3,30\n",
    );
    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();
    assert_eq!(count(&conn), 2);
    let orders: u64 = get_records(&conn, "s1")
        .unwrap()
        .iter()
        .map(|r| r.total_orders)
        .sum();
    assert_eq!(orders, 8);
}
