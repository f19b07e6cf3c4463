//! Core domain types for the transaction feed.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::Amount;

/// Transaction identifier, unique within one accumulated feed.
pub type TxId = String;

/// Kind of a transaction. Direction is derived from it: transfers leave the
/// account, everything else arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Transfer,
    Topup,
}

impl TransactionType {
    pub fn is_credit(self) -> bool {
        self != TransactionType::Transfer
    }

    /// Exact backend code; no trimming or case folding.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TRANSFER" => Some(TransactionType::Transfer),
            "TOPUP" => Some(TransactionType::Topup),
            _ => None,
        }
    }
}

/// Lenient parse for hand-written input: trimmed, case-insensitive.

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.trim().to_ascii_uppercase()).ok_or_else(|| s.to_string())
    }
}

/// A server-provided transaction record. Never mutated once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TxId,
    /// Non-negative; the sign comes from `kind`.
    pub amount: Amount,
    /// ISO 4217 code as sent by the server, not validated.
    pub currency: String,
    pub kind: TransactionType,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub counterparty: String,
}

/// One server-paginated batch of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<Transaction>,
    /// 1-based.
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u32,
    pub items_per_page: u32,
}

impl Page {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }
}

/// Type filter applied on top of the accumulated feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeedFilter {
    #[default]
    All,
    /// Transfers only.
    Sent,
    /// Everything that is not a transfer.
    Received,
}

impl FeedFilter {
    pub fn matches(self, kind: TransactionType) -> bool {
        match self {
            FeedFilter::All => true,
            FeedFilter::Sent => kind == TransactionType::Transfer,
            FeedFilter::Received => kind != TransactionType::Transfer,
        }
    }
}

impl FromStr for FeedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FeedFilter::All),
            "sent" => Ok(FeedFilter::Sent),
            "received" => Ok(FeedFilter::Received),
            other => Err(format!("unknown filter '{other}'")),
        }
    }
}
