//! Tunables of the feed: auto-load heuristic constants and presentation
//! settings.

use chrono::{FixedOffset, Offset, Utc};

/// What to do with a record whose id is already in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Append anyway; the record shows up twice.
    #[default]
    Keep,
    /// Drop records whose id is already accumulated.
    SkipKnown,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Visible-item floor below which another page is fetched automatically.
    pub auto_load_min: usize,
    /// Raise the floor to the size of the last fetched page.
    pub size_target_by_last_page: bool,
    pub auto_load: bool,
    pub duplicates: DuplicatePolicy,
    /// Used when a record carries an unknown currency code.
    pub fallback_currency: String,
    /// Offset of the viewer, used for timestamps and month buckets.
    pub viewer_offset: FixedOffset,
    /// Shown when a failed fetch carries no message of its own.
    pub fallback_error: String,
}

impl FeedConfig {
    pub const AUTO_LOAD_MIN: usize = 12;
    pub const FALLBACK_ERROR: &'static str = "Unable to load transactions";

    pub fn with_auto_load_min(mut self, min: usize) -> Self {
        self.auto_load_min = min;
        self
    }

    pub fn with_size_target_by_last_page(mut self, enabled: bool) -> Self {
        self.size_target_by_last_page = enabled;
        self
    }

    pub fn with_auto_load(mut self, enabled: bool) -> Self {
        self.auto_load = enabled;
        self
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn with_fallback_currency(mut self, code: impl Into<String>) -> Self {
        self.fallback_currency = code.into();
        self
    }

    pub fn with_viewer_offset(mut self, offset: FixedOffset) -> Self {
        self.viewer_offset = offset;
        self
    }

    /// Number of visible items the auto-loader tries to reach.
    pub fn auto_load_target(&self, last_page_size: usize) -> usize {
        if self.size_target_by_last_page {
            last_page_size.max(self.auto_load_min)
        } else {
            self.auto_load_min
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            auto_load_min: Self::AUTO_LOAD_MIN,
            size_target_by_last_page: true,
            auto_load: true,
            duplicates: DuplicatePolicy::Keep,
            fallback_currency: "USD".to_string(),
            viewer_offset: Utc.fix(),
            fallback_error: Self::FALLBACK_ERROR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.auto_load_min, 12);
        assert!(config.auto_load);
        assert_eq!(config.duplicates, DuplicatePolicy::Keep);
        assert_eq!(config.fallback_currency, "USD");
        assert_eq!(config.viewer_offset.local_minus_utc(), 0);
    }

    #[test]
    fn target_is_larger_of_last_page_and_floor() {
        let config = FeedConfig::default();
        assert_eq!(config.auto_load_target(0), 12);
        assert_eq!(config.auto_load_target(5), 12);
        assert_eq!(config.auto_load_target(20), 20);
    }

    #[test]
    fn target_ignores_page_size_when_disabled() {
        let config = FeedConfig::default()
            .with_auto_load_min(4)
            .with_size_target_by_last_page(false);
        assert_eq!(config.auto_load_target(20), 4);
    }
}
