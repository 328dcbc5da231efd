// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PeriodMode, RawRecord};
use crate::source::upsert_record;
use crate::utils::{http_client, parse_period};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

pub const TOKEN_ENV: &str = "SALESBOARD_TOKEN";

/// Credentials and endpoint for the statistics API, passed explicitly to
/// every fetch.
#[derive(Debug, Clone)]
pub struct ApiContext {
    pub base_url: String,
    pub token: Option<String>,
}

impl ApiContext {
    pub fn statistics_url(&self) -> String {
        format!("{}/api/statistics", self.base_url.trim_end_matches('/'))
    }
}

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = ApiContext {
        base_url: sub.get_one::<String>("url").unwrap().trim().to_string(),
        token: sub
            .get_one::<String>("token")
            .cloned()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty()),
    };
    let period = sub
        .get_one::<String>("period")
        .map(String::as_str)
        .map(parse_period)
        .transpose()?;
    let records = fetch_records(&ctx, period)?;
    let n = store_records(conn, &records)?;
    info!(url = %ctx.statistics_url(), count = n, "synced daily statistics");
    println!("Synced {} records from {}", n, ctx.base_url);
    Ok(())
}

/// Value of the `period` query parameter for a selection. The API scopes
/// `week|month|year` and returns everything for other values; `custom` has no
/// server-side meaning and is left off.
pub fn period_query(period: Option<PeriodMode>) -> Option<&'static str> {
    match period {
        Some(PeriodMode::Custom) | None => None,
        Some(p) => Some(p.as_str()),
    }
}

/// Fetch raw daily records for an optional period selection.
pub fn fetch_records(ctx: &ApiContext, period: Option<PeriodMode>) -> Result<Vec<RawRecord>> {
    let client = http_client(Duration::from_secs(15))?;
    let mut req = client.get(ctx.statistics_url());
    if let Some(p) = period_query(period) {
        req = req.query(&[("period", p)]);
    }
    if let Some(token) = &ctx.token {
        req = req.bearer_auth(token);
    }
    let resp = req
        .send()
        .with_context(|| format!("GET {}", ctx.statistics_url()))?
        .error_for_status()?;
    let body = resp.text()?;
    parse_records(&body)
}

pub fn parse_records(body: &str) -> Result<Vec<RawRecord>> {
    serde_json::from_str(body).context("Decode statistics response")
}

/// Upsert fetched records in one transaction. Returns the number of distinct
/// `(id, date)` rows written; repeats of a key within one batch collapse into
/// the last one.
pub fn store_records(conn: &mut Connection, records: &[RawRecord]) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut written = BTreeSet::new();
    let mut inserted = 0usize;
    for r in records {
        if upsert_record(&tx, r)? {
            inserted += 1;
        }
        written.insert((r.id.as_str(), r.date.as_str()));
    }
    tx.commit()?;
    debug!(rows = written.len(), inserted, "stored fetched records");
    Ok(written.len())
}
