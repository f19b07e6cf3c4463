use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::model::TransactionType;
use crate::view::MonthGroup;
use crate::{Amount, Transaction};

/// Errors that can occur when reading or writing csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized transaction type '{tx_type}'")]
    UnrecognizedType { line: usize, tx_type: String },

    #[error("line {line}: amount {value} is not a representable money value")]
    InvalidAmount { line: usize, value: f64 },

    #[error("line {line}: negative amount {value}")]
    NegativeAmount { line: usize, value: f64 },

    #[error("line {line}: invalid created_at '{value}'")]
    Timestamp { line: usize, value: String },

    #[error("failed to write row: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush output: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct InputRow {
    id: String,
    /// Major units, e.g. `12.34`.
    amount: f64,
    currency: String,
    r#type: String,
    status: String,
    created_at: String,
    counterparty: String,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    month: &'a str,
    id: &'a str,
    title: &'a str,
    subtitle: &'a str,
    amount: &'a str,
    direction: &'a str,
    status: &'a str,
    currency: &'a str,
}

/// Read transaction records from a csv file
pub fn read_transactions(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Transaction, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let amount = Amount::from_float(row.amount).ok_or(CsvError::InvalidAmount {
                line,
                value: row.amount,
            })?;
            if amount.is_negative() {
                return Err(CsvError::NegativeAmount {
                    line,
                    value: row.amount,
                });
            }
            let kind = row
                .r#type
                .parse::<TransactionType>()
                .map_err(|tx_type| CsvError::UnrecognizedType { line, tx_type })?;
            let created_at = DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|_| CsvError::Timestamp {
                    line,
                    value: row.created_at.clone(),
                })?
                .with_timezone(&Utc);

            Ok(Transaction {
                id: row.id,
                amount,
                currency: row.currency,
                kind,
                status: row.status,
                created_at,
                counterparty: row.counterparty,
            })
        }))
}

/// Write grouped display items in csv format, one row per item
pub fn write_groups(writer: impl io::Write, groups: &[MonthGroup]) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for group in groups {
        for item in &group.items {
            writer.serialize(OutputRow {
                month: &group.label,
                id: &item.id,
                title: &item.title,
                subtitle: &item.subtitle,
                amount: &item.amount_label,
                direction: &item.direction_label,
                status: &item.status_label,
                currency: &item.currency_code,
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}
