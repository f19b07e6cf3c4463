//! The page boundary: anything able to return page `n` of the feed.

use std::future::Future;

use crate::controller::FetchError;
use crate::model::{Page, Transaction};

/// Source of server-paginated transaction pages. Page numbers are 1-based.
pub trait PageFetcher {
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Page, FetchError>> + Send;
}

/// Serves pages held in memory, either pre-built or cut from a record list.
#[derive(Debug, Clone)]
pub struct InMemoryFetcher {
    pages: Vec<Page>,
}

impl InMemoryFetcher {
    /// Serve `pages` as-is; page `n` is `pages[n - 1]`.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Split `records` into pages of `page_size`. An empty list still yields
    /// one empty page, so page 1 always exists.
    pub fn paginate(records: Vec<Transaction>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = saturate(records.len());
        let chunks: Vec<Vec<Transaction>> = if records.is_empty() {
            vec![Vec::new()]
        } else {
            records.chunks(page_size).map(<[Transaction]>::to_vec).collect()
        };
        let total_pages = saturate(chunks.len());

        let pages = chunks
            .into_iter()
            .enumerate()
            .map(|(idx, records)| Page {
                records,
                current_page: saturate(idx + 1),
                total_pages,
                total_items,
                items_per_page: saturate(page_size),
            })
            .collect();
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, number: u32) -> Result<Page, FetchError> {
        number
            .checked_sub(1)
            .and_then(|idx| self.pages.get(idx as usize))
            .cloned()
            .ok_or_else(|| FetchError::new(format!("page {number} does not exist")))
    }
}

/// Page counters are `u32`; larger counts clamp instead of wrapping.
fn saturate(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

impl PageFetcher for InMemoryFetcher {
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Page, FetchError>> + Send {
        let result = self.page(page);
        async move { result }
    }
}
