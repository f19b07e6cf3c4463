//! ISO 4217 lookup and money formatting.

use crate::Amount;

/// A recognized currency with its display conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Default number of fraction digits (0 or 2).
    pub fraction_digits: u8,
}

const fn currency(code: &'static str, symbol: &'static str, fraction_digits: u8) -> Currency {
    Currency {
        code,
        symbol,
        fraction_digits,
    }
}

pub const USD: Currency = currency("USD", "$", 2);

const KNOWN: &[Currency] = &[
    USD,
    currency("EUR", "€", 2),
    currency("GBP", "£", 2),
    currency("JPY", "¥", 0),
    currency("CAD", "CA$", 2),
    currency("AUD", "A$", 2),
    currency("NZD", "NZ$", 2),
    currency("MXN", "MX$", 2),
    currency("BRL", "R$", 2),
    currency("INR", "₹", 2),
    currency("CNY", "CN¥", 2),
    currency("KRW", "₩", 0),
    currency("ILS", "₪", 2),
    currency("VND", "₫", 0),
    currency("CHF", "CHF", 2),
    currency("SEK", "SEK", 2),
    currency("NOK", "NOK", 2),
    currency("DKK", "DKK", 2),
    currency("PLN", "PLN", 2),
    currency("ZAR", "ZAR", 2),
    currency("NGN", "NGN", 2),
    currency("KES", "KES", 2),
    currency("SGD", "SGD", 2),
    currency("HKD", "HK$", 2),
];

impl Currency {
    /// Exact, case-sensitive ISO code lookup.
    pub fn lookup(code: &str) -> Option<Currency> {
        KNOWN.iter().find(|c| c.code == code).copied()
    }

    /// `code` if recognized, else `fallback`, else USD. Never fails.
    pub fn resolve(code: &str, fallback: &str) -> Currency {
        Self::lookup(code)
            .or_else(|| Self::lookup(fallback))
            .unwrap_or(USD)
    }

    /// Format a magnitude en-US style: symbol prefix, comma grouping,
    /// the currency's fraction digits. The sign is left to the caller.
    pub fn format(&self, amount: Amount) -> String {
        let minor = amount.abs().minor_units();
        let (whole, frac) = match self.fraction_digits {
            0 => (round_half_even(minor, Amount::SCALE), None),
            _ => (minor / Amount::SCALE, Some(minor % Amount::SCALE)),
        };
        let mut out = String::from(self.symbol);
        out.push_str(&group_thousands(whole));
        if let Some(frac) = frac {
            out.push_str(&format!(".{frac:02}"));
        }
        out
    }
}

fn round_half_even(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    match (remainder * 2).cmp(&divisor) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient % 2),
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
