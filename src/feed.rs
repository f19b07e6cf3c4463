//! Accumulation of fetched pages into one session-scoped feed.

use std::collections::HashSet;

use crate::config::DuplicatePolicy;
use crate::model::{Page, Transaction, TxId};

/// All records fetched since the last refresh, in arrival order, plus the
/// page counters of the most recent fetch.
#[derive(Debug)]
pub struct Feed {
    records: Vec<Transaction>,
    /// Only populated under `DuplicatePolicy::SkipKnown`.
    seen: HashSet<TxId>,
    duplicates: DuplicatePolicy,
    current_page: u32,
    total_pages: u32,
    last_page_size: usize,
}

impl Feed {
    pub fn new(duplicates: DuplicatePolicy) -> Self {
        Self {
            records: Vec::new(),
            seen: HashSet::new(),
            duplicates,
            current_page: 0,
            total_pages: 1,
            last_page_size: 0,
        }
    }

    /// Forget everything: no page fetched yet.
    pub fn reset(&mut self) {
        self.records.clear();
        self.seen.clear();
        self.current_page = 0;
        self.total_pages = 1;
        self.last_page_size = 0;
    }

    /// Append the records of `page`, fetched as page number `requested`.
    /// Returns the number of records actually added.
    pub fn append(&mut self, requested: u32, page: Page) -> usize {
        self.total_pages = page.total_pages.max(1);
        self.current_page = requested;
        self.last_page_size = (page.items_per_page as usize).max(page.records.len());

        let before = self.records.len();
        match self.duplicates {
            DuplicatePolicy::Keep => self.records.extend(page.records),
            DuplicatePolicy::SkipKnown => {
                for record in page.records {
                    if self.seen.insert(record.id.clone()) {
                        self.records.push(record);
                    }
                }
            }
        }
        self.records.len() - before
    }

    /// Refresh semantics: drop what was accumulated, then append.
    pub fn replace(&mut self, requested: u32, page: Page) -> usize {
        self.records.clear();
        self.seen.clear();
        self.append(requested, page)
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// max(declared items per page, records actually returned) of the last page.
    pub fn last_page_size(&self) -> usize {
        self.last_page_size
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn is_end_reached(&self) -> bool {
        !self.has_more()
    }

    pub fn next_page(&self) -> u32 {
        self.current_page + 1
    }
}
