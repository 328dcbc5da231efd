// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BucketSummary, GrandTotals, PeriodMode, RawRecord};
use std::collections::BTreeMap;

use super::bucket::derive_key;
use super::record_date;

/// Partition records by bucket label. Members keep their input order, so the
/// first entry of each list is the bucket's representative record. Records
/// whose date cannot be read have no label and are left out.
pub fn group_records<'a, I>(records: I, mode: PeriodMode) -> BTreeMap<String, Vec<&'a RawRecord>>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut groups: BTreeMap<String, Vec<&'a RawRecord>> = BTreeMap::new();
    for r in records {
        if let Some(key) = derive_key(r, mode) {
            groups.entry(key).or_default().push(r);
        }
    }
    groups
}

/// Reduce each bucket to one summary row, sorted ascending by date.
pub fn summarize(groups: BTreeMap<String, Vec<&RawRecord>>) -> Vec<BucketSummary> {
    let mut out = Vec::with_capacity(groups.len());
    for (label, members) in groups {
        let Some((first, date)) = members
            .first()
            .and_then(|r| record_date(r).map(|d| (*r, d)))
        else {
            continue;
        };
        let sums = GrandTotals::from_records(members.iter().copied());
        out.push(BucketSummary {
            id: first.id.clone(),
            label,
            date,
            total_orders: sums.total_orders,
            total_items_sold: sums.total_items_sold,
            total_revenue: sums.total_revenue,
        });
    }
    // label breaks ties so output never depends on map iteration order
    out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.label.cmp(&b.label)));
    out
}

pub fn grand_totals(buckets: &[BucketSummary]) -> GrandTotals {
    let mut t = GrandTotals::default();
    for b in buckets {
        t.add_summary(b);
    }
    t
}
