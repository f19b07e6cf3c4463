//! JSON payloads of the transactions REST endpoint and their mapping to the
//! domain model.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::Amount;
use crate::controller::FetchError;
use crate::fetch::PageFetcher;
use crate::model::{Page, Transaction, TransactionType};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("transaction {id}: unrecognized type '{kind}'")]
    UnknownType { id: String, kind: String },

    #[error("transaction {id}: negative amount_in_cents {amount_in_cents}")]
    NegativeAmount { id: String, amount_in_cents: i64 },

    #[error("transaction {id}: invalid created_at '{value}': {source}")]
    Timestamp {
        id: String,
        value: String,
        source: chrono::ParseError,
    },

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<WireError> for FetchError {
    fn from(e: WireError) -> Self {
        FetchError::new(e.to_string())
    }
}

/// Response body of `GET /transactions?page=n`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEnvelope {
    pub status: String,
    pub message: String,
    pub pagination: Pagination,
    pub data: Vec<TransactionDto>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u32,
    pub items_per_page: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionDto {
    pub id: String,
    pub amount_in_cents: i64,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    /// RFC 3339
    pub created_at: String,
    pub destination_id: String,
}

impl TransactionDto {
    pub fn into_transaction(self) -> Result<Transaction, WireError> {
        let kind = TransactionType::from_code(&self.kind).ok_or_else(|| WireError::UnknownType {
            id: self.id.clone(),
            kind: self.kind.clone(),
        })?;
        if self.amount_in_cents < 0 {
            return Err(WireError::NegativeAmount {
                id: self.id,
                amount_in_cents: self.amount_in_cents,
            });
        }
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|source| WireError::Timestamp {
                id: self.id.clone(),
                value: self.created_at.clone(),
                source,
            })?
            .with_timezone(&Utc);

        Ok(Transaction {
            id: self.id,
            amount: Amount::from_minor(self.amount_in_cents),
            currency: self.currency,
            kind,
            status: self.status,
            created_at,
            counterparty: self.destination_id,
        })
    }
}

impl TransactionEnvelope {
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Map to a domain page. One bad record fails the whole page.
    pub fn into_page(self) -> Result<Page, WireError> {
        let records = self
            .data
            .into_iter()
            .map(TransactionDto::into_transaction)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            records,
            current_page: self.pagination.current_page,
            total_pages: self.pagination.total_pages,
            total_items: self.pagination.total_items,
            items_per_page: self.pagination.items_per_page,
        })
    }
}

/// Serves recorded response bodies, decoding each one only when its page is
/// requested. Decoding failures surface as fetch failures.
#[derive(Debug, Clone)]
pub struct JsonPageSource {
    bodies: Vec<String>,
}

impl JsonPageSource {
    /// `json` is an array of envelopes, one per page, in page order.
    pub fn from_array(json: &str) -> Result<Self, WireError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        Ok(Self {
            bodies: values.iter().map(ToString::to_string).collect(),
        })
    }

    pub fn decode(&self, page: u32) -> Result<Page, FetchError> {
        let body = page
            .checked_sub(1)
            .and_then(|idx| self.bodies.get(idx as usize))
            .ok_or_else(|| FetchError::new(format!("page {page} does not exist")))?;
        Ok(TransactionEnvelope::from_json(body)?.into_page()?)
    }
}

impl PageFetcher for JsonPageSource {
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Page, FetchError>> + Send {
        let result = self.decode(page);
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ENVELOPE: &str = r#"{
        "status": "success",
        "message": "ok",
        "pagination": {
            "current_page": 1,
            "total_pages": 4,
            "total_items": 40,
            "items_per_page": 10
        },
        "data": [
            {
                "id": "1",
                "amount_in_cents": 1234,
                "currency": "USD",
                "type": "TRANSFER",
                "status": "completed",
                "created_at": "2024-01-01T00:00:00Z",
                "destination_id": "alex@example.com"
            }
        ]
    }"#;

    #[test]
    fn maps_network_response() {
        let page = TransactionEnvelope::from_json(ENVELOPE)
            .unwrap()
            .into_page()
            .unwrap();

        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.items_per_page, 10);
        assert_eq!(page.records.len(), 1);

        let tx = &page.records[0];
        assert_eq!(tx.amount, Amount::from_minor(1234));
        assert_eq!(tx.amount.to_string(), "12.34");
        assert_eq!(tx.kind, TransactionType::Transfer);
        assert_eq!(tx.counterparty, "alex@example.com");
        assert_eq!(tx.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn unknown_type_fails_the_page() {
        let json = ENVELOPE.replace("TRANSFER", "REFUND");
        let err = TransactionEnvelope::from_json(&json)
            .unwrap()
            .into_page()
            .unwrap_err();
        assert!(matches!(err, WireError::UnknownType { ref kind, .. } if kind == "REFUND"));
    }

    #[test]
    fn type_codes_match_exactly() {
        for code in ["transfer", " TRANSFER", "Topup"] {
            let json = ENVELOPE.replace("\"TRANSFER\"", &format!("\"{code}\""));
            let err = TransactionEnvelope::from_json(&json)
                .unwrap()
                .into_page()
                .unwrap_err();
            assert!(matches!(err, WireError::UnknownType { ref kind, .. } if kind == code));
        }
    }

    #[test]
    fn negative_amount_fails_the_page() {
        let topup = ENVELOPE
            .replace("1234", "-500")
            .replace("TRANSFER", "TOPUP");
        let err = TransactionEnvelope::from_json(&topup)
            .unwrap()
            .into_page()
            .unwrap_err();
        assert!(matches!(
            err,
            WireError::NegativeAmount { amount_in_cents: -500, .. }
        ));

        let min = ENVELOPE.replace("1234", &i64::MIN.to_string());
        let err = TransactionEnvelope::from_json(&min)
            .unwrap()
            .into_page()
            .unwrap_err();
        assert!(matches!(err, WireError::NegativeAmount { .. }));
    }

    #[test]
    fn largest_amount_still_normalizes() {
        use crate::config::FeedConfig;
        use crate::display::Normalizer;

        let json = ENVELOPE.replace("1234", &i64::MAX.to_string());
        let page = TransactionEnvelope::from_json(&json)
            .unwrap()
            .into_page()
            .unwrap();
        let item = Normalizer::new(&FeedConfig::default()).normalize(&page.records[0]);
        assert!(!item.is_credit);
        assert_eq!(item.amount_label, "-$92,233,720,368,547,758.07");
    }

    #[test]
    fn bad_timestamp_fails_the_page() {
        let json = ENVELOPE.replace("2024-01-01T00:00:00Z", "yesterday");
        let err = TransactionEnvelope::from_json(&json)
            .unwrap()
            .into_page()
            .unwrap_err();
        assert!(matches!(err, WireError::Timestamp { .. }));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            TransactionEnvelope::from_json("{"),
            Err(WireError::Json(_))
        ));
    }

    #[test]
    fn wire_errors_become_fetch_errors() {
        let err: FetchError = WireError::UnknownType {
            id: "7".to_string(),
            kind: "X".to_string(),
        }
        .into();
        assert_eq!(
            err.message.as_deref(),
            Some("transaction 7: unrecognized type 'X'")
        );
    }

    #[test]
    fn page_source_decodes_on_demand() {
        let broken = ENVELOPE.replace("TRANSFER", "REFUND");
        let source = JsonPageSource::from_array(&format!("[{ENVELOPE}, {broken}]")).unwrap();

        assert_eq!(source.decode(1).unwrap().records.len(), 1);
        assert_eq!(
            source.decode(2).unwrap_err().message.as_deref(),
            Some("transaction 1: unrecognized type 'REFUND'")
        );
        assert!(source.decode(3).is_err());
    }

    #[test]
    fn page_source_rejects_non_arrays() {
        assert!(JsonPageSource::from_array(ENVELOPE).is_err());
    }

    #[tokio::test]
    async fn page_source_is_a_fetcher() {
        let source = JsonPageSource::from_array(&format!("[{ENVELOPE}]")).unwrap();
        let page = source.fetch_page(1).await.unwrap();
        assert_eq!(page.total_pages, 4);
    }
}
