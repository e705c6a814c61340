//! Source-specific text formatting
//!
//! Every formatter is a pure function from a match list to a text block. Optional
//! fields are skipped when absent or empty; they are never rendered as blanks.
//! Money and dates use German conventions (`1.234,56 EUR`, `31.12.2024`).

mod datev;
mod law;
mod susa;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

pub use datev::format_datev_addressees;
pub use datev::format_datev_analytics;
pub use datev::format_datev_clients;
pub use datev::format_datev_corporate_tax;
pub use datev::format_datev_employees;
pub use datev::format_datev_orders;
pub use datev::format_datev_trade_tax;
pub use law::format_chat_documents;
pub use law::format_law_publishers;
pub use law::format_tax_law;
pub use susa::format_susa_entries;

/// Currency assumed when a record carries none
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Relevance as a whole percentage
pub fn relevance_percent(similarity: f64) -> i64 {
    (similarity * 100.0).round() as i64
}

/// Trailing relevance annotation, e.g. `(87% relevant)`
pub fn relevance_annotation(similarity: f64) -> String {
    format!("({}% relevant)", relevance_percent(similarity))
}

/// German money format with two decimals and a trailing currency code
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    let plain = rounded.to_string();
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let sign = if negative { "-" } else { "" };

    format!("{sign}{},{fraction} {currency}", group_thousands(integer))
}

/// German number format without currency; trailing zeros are dropped
pub fn format_number(value: Decimal) -> String {
    let plain = value.normalize().to_string();
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    match digits.split_once('.') {
        Some((integer, fraction)) => format!("{sign}{},{fraction}", group_thousands(integer)),
        None => format!("{sign}{}", group_thousands(digits)),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// German date format `DD.MM.YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Returns the original string when it fits, otherwise the first `max_chars`
/// characters followed by `...`.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// `Some` only for present, non-blank text
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Join fields with ` | ` and append the relevance annotation
pub(crate) fn pipe_line(parts: &[String], similarity: f64) -> String {
    format!("{} {}", parts.join(" | "), relevance_annotation(similarity))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_format_money_grouping() {
        assert_eq!(format_money(dec("0"), "EUR"), "0,00 EUR");
        assert_eq!(format_money(dec("12.5"), "EUR"), "12,50 EUR");
        assert_eq!(format_money(dec("999.99"), "EUR"), "999,99 EUR");
        assert_eq!(format_money(dec("1000"), "EUR"), "1.000,00 EUR");
        assert_eq!(format_money(dec("1234567.891"), "EUR"), "1.234.567,89 EUR");
        assert_eq!(format_money(dec("100000"), "CHF"), "100.000,00 CHF");
    }

    #[test]
    fn test_format_money_negative_and_rounding() {
        assert_eq!(format_money(dec("-1234"), "EUR"), "-1.234,00 EUR");
        assert_eq!(format_money(dec("0.005"), "EUR"), "0,01 EUR");
        assert_eq!(format_money(dec("-0.001"), "EUR"), "0,00 EUR");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(dec("38.50")), "38,5");
        assert_eq!(format_number(dec("40")), "40");
        assert_eq!(format_number(dec("12345.25")), "12.345,25");
        assert_eq!(format_number(dec("-2.5")), "-2,5");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 9).unwrap();
        assert_eq!(format_date(date), "09.03.2021");
    }

    #[test]
    fn test_relevance() {
        assert_eq!(relevance_percent(0.876), 88);
        assert_eq!(relevance_percent(0.3), 30);
        assert_eq!(relevance_percent(1.0), 100);
        assert_eq!(relevance_annotation(0.451), "(45% relevant)");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("Körperschaftsteuer", 5), "Körpe...");
        assert_eq!(truncate_str("GewSt", 10), "GewSt");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(&"  ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(&"BFH".to_string())), Some("BFH"));
    }
}
