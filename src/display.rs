//! Projection of transaction records into display-ready items.

use chrono::{DateTime, FixedOffset};

use crate::config::FeedConfig;
use crate::currency::Currency;
use crate::model::{Transaction, TxId};

/// Medium date, short time (en-US): `Jan 1, 2024, 12:00 AM`.
const TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// UI-ready view of one transaction. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: TxId,
    pub title: String,
    pub subtitle: String,
    pub amount_label: String,
    pub is_credit: bool,
    pub status_label: String,
    pub direction_label: String,
    pub counterparty_label: String,
    pub currency_code: String,
    /// Creation instant in the viewer's offset.
    pub local_time: DateTime<FixedOffset>,
}

impl DisplayItem {
    /// Lower-cased text the search query is matched against.
    pub fn search_text(&self) -> String {
        [
            self.title.as_str(),
            self.counterparty_label.as_str(),
            self.status_label.as_str(),
            self.direction_label.as_str(),
            self.amount_label.as_str(),
            self.currency_code.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

/// Maps records to [`DisplayItem`]s using the viewer's offset and fallback
/// currency.
#[derive(Debug, Clone)]
pub struct Normalizer {
    offset: FixedOffset,
    fallback_currency: String,
}

impl Normalizer {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            offset: config.viewer_offset,
            fallback_currency: config.fallback_currency.clone(),
        }
    }

    pub fn normalize(&self, tx: &Transaction) -> DisplayItem {
        let is_credit = tx.kind.is_credit();
        let signed = if is_credit { tx.amount } else { -tx.amount };
        let formatted = Currency::resolve(&tx.currency, &self.fallback_currency).format(signed);
        let amount_label = if signed.signum() >= 0 {
            format!("+{formatted}")
        } else {
            format!("-{formatted}")
        };

        let local_time = tx.created_at.with_timezone(&self.offset);
        let counterparty = tx.counterparty.clone();
        let direction_label = if is_credit {
            format!("Received from {counterparty}")
        } else {
            format!("Sent to {counterparty}")
        };

        DisplayItem {
            id: tx.id.clone(),
            title: counterparty.clone(),
            subtitle: local_time.format(TIMESTAMP_FORMAT).to_string(),
            amount_label,
            is_credit,
            status_label: capitalize(&tx.status),
            direction_label,
            counterparty_label: counterparty,
            currency_code: tx.currency.clone(),
            local_time,
        }
    }
}

/// Uppercase the first character if it is lowercase; the rest is untouched.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}
