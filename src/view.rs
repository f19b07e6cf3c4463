//! Filtering, search and month grouping over the accumulated feed.
//!
//! Everything here is recomputed from scratch on every change; there is no
//! incremental diffing.

use chrono::{Datelike, Month};

use crate::display::{DisplayItem, Normalizer};
use crate::model::{FeedFilter, Transaction};

/// Calendar bucket. Ordering is (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl MonthKey {
    pub fn of(item: &DisplayItem) -> Self {
        Self {
            year: item.local_time.year(),
            month: item.local_time.month(),
        }
    }

    /// `October 2024`
    pub fn label(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or_default();
        format!("{name} {}", self.year)
    }
}

/// Display items of one calendar month, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    pub key: MonthKey,
    pub label: String,
    pub items: Vec<DisplayItem>,
}

fn sort_newest_first(items: &mut [DisplayItem]) {
    // stable: equal timestamps keep arrival order
    items.sort_by(|a, b| b.local_time.cmp(&a.local_time));
}

/// Apply the type filter and the search query, newest first.
///
/// The query is trimmed and lower-cased; a blank query matches everything.
pub fn filter_items(
    records: &[Transaction],
    filter: FeedFilter,
    query: &str,
    normalizer: &Normalizer,
) -> Vec<DisplayItem> {
    let query = query.trim().to_lowercase();
    let mut items: Vec<DisplayItem> = records
        .iter()
        .filter(|tx| filter.matches(tx.kind))
        .map(|tx| normalizer.normalize(tx))
        .filter(|item| query.is_empty() || item.search_text().contains(&query))
        .collect();
    sort_newest_first(&mut items);
    items
}

/// Bucket items by (year, month), newest bucket first. Items are re-sorted
/// inside each bucket, so input order does not matter.
pub fn group_by_month(items: Vec<DisplayItem>) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    for item in items {
        let key = MonthKey::of(&item);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.items.push(item),
            None => groups.push(MonthGroup {
                key,
                label: key.label(),
                items: vec![item],
            }),
        }
    }

    groups.sort_by(|a, b| b.key.cmp(&a.key));
    for group in &mut groups {
        sort_newest_first(&mut group.items);
    }
    groups
}

/// Filter, search and group in one pass. An empty feed yields no groups.
pub fn build_groups(
    records: &[Transaction],
    filter: FeedFilter,
    query: &str,
    normalizer: &Normalizer,
) -> Vec<MonthGroup> {
    if records.is_empty() {
        return Vec::new();
    }
    group_by_month(filter_items(records, filter, query, normalizer))
}
