//! Field normalizers: amount, date, transaction type
//!
//! All three fail soft. A field that does not parse returns `None` and the
//! row is simply excluded from the valid set; nothing here ever raises.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::TransactionType;

/// Parse a raw amount cell into signed minor units (cents, kopecks)
///
/// Accepts a leading numeric token with an optional sign, internal spaces
/// as thousands separators, and an optional 1-2 digit fraction introduced
/// by `.` or `,`. Trailing junk after the token (currency symbols etc.) is
/// ignored. The sign is preserved so callers can derive direction from it.
pub fn parse_amount_minor_units(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let token_re = Regex::new(r"^([+-]?\s*[0-9\s]+(?:[.,][0-9]{1,2})?)").unwrap();
    let token = token_re.captures(trimmed)?.get(1)?.as_str();
    let cleaned: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = cleaned.replace(',', ".");
    let value: Decimal = normalized.parse().ok()?;
    (value * Decimal::from(100)).round().to_i64()
}

/// Parse a raw date cell into local-time epoch seconds
///
/// Tries, in order:
/// 1. `YYYY sep MM sep DD` with separators `.`/`/`/`-`, optionally followed
///    by `T` or space and `HH:MM[:SS]`
/// 2. `DD sep MM sep YYYY` (or two-digit year, read as 2000+YY) with
///    separators `.`/`,`/`/`/`-` and the same optional time suffix
/// 3. full RFC 3339, only when the string contains `T`
///
/// Day-month-year order is strict in form 2; `02.01.2024` is January 2nd.
/// Construction uses local calendar fields, no timezone conversion beyond
/// what the local-time constructor implies.
pub fn parse_date_seconds(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let iso_re = Regex::new(
        r"^(\d{4})[./-](\d{1,2})[./-](\d{1,2})(?:[T\s]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?$",
    )
    .unwrap();
    if let Some(caps) = iso_re.captures(s) {
        return local_seconds(
            caps.get(1)?.as_str().parse().ok()?,
            caps.get(2)?.as_str().parse().ok()?,
            caps.get(3)?.as_str().parse().ok()?,
            &caps,
        );
    }

    let dmy_re = Regex::new(
        r"^(\d{1,2})[.,/-](\d{1,2})[.,/-](\d{2,4})(?:\s+(\d{1,2}):(\d{2})(?::(\d{2}))?)?$",
    )
    .unwrap();
    if let Some(caps) = dmy_re.captures(s) {
        let year_raw = caps.get(3)?.as_str();
        let mut year: i32 = year_raw.parse().ok()?;
        if year_raw.len() == 2 {
            year += 2000;
        }
        return local_seconds(
            year,
            caps.get(2)?.as_str().parse().ok()?,
            caps.get(1)?.as_str().parse().ok()?,
            &caps,
        );
    }

    if s.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.timestamp());
        }
    }
    None
}

fn local_seconds(year: i32, month: u32, day: u32, caps: &regex::Captures<'_>) -> Option<i64> {
    let part = |i: usize| {
        caps.get(i)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0u32)
    };
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(part(4), part(5), part(6))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
}

const EXPENSE_TOKENS: [&str; 4] = ["expense", "расход", "debit", "-"];
const INCOME_TOKENS: [&str; 4] = ["income", "доход", "credit", "+"];

/// Infer a transaction type from an optional type cell, falling back to the
/// sign of the parsed amount
///
/// Zero or unparseable amounts with no recognized type token yield `None`.
pub fn infer_type(raw: Option<&str>, amount_minor_units: Option<i64>) -> Option<TransactionType> {
    if let Some(raw) = raw {
        let v = raw.trim().to_lowercase();
        if EXPENSE_TOKENS.contains(&v.as_str()) {
            return Some(TransactionType::Expense);
        }
        if INCOME_TOKENS.contains(&v.as_str()) {
            return Some(TransactionType::Income);
        }
    }
    match amount_minor_units {
        Some(a) if a < 0 => Some(TransactionType::Expense),
        Some(a) if a > 0 => Some(TransactionType::Income),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local_midnight(year: i32, month: u32, day: u32) -> i64 {
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .timestamp()
    }

    #[test]
    fn test_amount_with_space_separator_and_comma_decimal() {
        assert_eq!(parse_amount_minor_units("1 234,56"), Some(123_456));
    }

    #[test]
    fn test_amount_negative_whole() {
        assert_eq!(parse_amount_minor_units("-50"), Some(-5_000));
    }

    #[test]
    fn test_amount_plain_and_dot_decimal() {
        assert_eq!(parse_amount_minor_units("1200.50"), Some(120_050));
        assert_eq!(parse_amount_minor_units("+17.5"), Some(1_750));
    }

    #[test]
    fn test_amount_ignores_trailing_currency() {
        assert_eq!(parse_amount_minor_units("99,90 RUB"), Some(9_990));
    }

    #[test]
    fn test_amount_unparseable() {
        assert_eq!(parse_amount_minor_units("abc"), None);
        assert_eq!(parse_amount_minor_units(""), None);
        assert_eq!(parse_amount_minor_units("   "), None);
    }

    #[test]
    fn test_date_iso() {
        assert_eq!(
            parse_date_seconds("2024-01-02"),
            Some(local_midnight(2024, 1, 2))
        );
        assert_eq!(
            parse_date_seconds("2024/01/02"),
            Some(local_midnight(2024, 1, 2))
        );
    }

    #[test]
    fn test_date_day_month_year_order() {
        // Day first, never month first
        assert_eq!(
            parse_date_seconds("02.01.2024"),
            Some(local_midnight(2024, 1, 2))
        );
        assert_eq!(
            parse_date_seconds("31.12.2023"),
            Some(local_midnight(2023, 12, 31))
        );
    }

    #[test]
    fn test_date_two_digit_year() {
        assert_eq!(
            parse_date_seconds("02.01.24"),
            Some(local_midnight(2024, 1, 2))
        );
    }

    #[test]
    fn test_date_with_time_suffix() {
        let expected = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 1, 2)
                    .unwrap()
                    .and_hms_opt(13, 45, 30)
                    .unwrap(),
            )
            .earliest()
            .unwrap()
            .timestamp();
        assert_eq!(parse_date_seconds("2024-01-02 13:45:30"), Some(expected));
        assert_eq!(parse_date_seconds("02.01.2024 13:45:30"), Some(expected));
    }

    #[test]
    fn test_date_rfc3339_fallback() {
        let seconds = parse_date_seconds("2024-01-02T10:00:00+03:00").unwrap();
        assert_eq!(seconds, 1_704_178_800);
    }

    #[test]
    fn test_date_unparseable() {
        assert_eq!(parse_date_seconds("not a date"), None);
        assert_eq!(parse_date_seconds("32.13.2024"), None);
    }

    #[test]
    fn test_type_from_explicit_tokens() {
        assert_eq!(
            infer_type(Some("expense"), None),
            Some(TransactionType::Expense)
        );
        assert_eq!(
            infer_type(Some(" Доход "), None),
            Some(TransactionType::Income)
        );
        assert_eq!(infer_type(Some("+"), None), Some(TransactionType::Income));
        assert_eq!(infer_type(Some("-"), None), Some(TransactionType::Expense));
    }

    #[test]
    fn test_type_falls_back_to_amount_sign() {
        assert_eq!(
            infer_type(None, Some(-10_000)),
            Some(TransactionType::Expense)
        );
        assert_eq!(
            infer_type(None, Some(10_000)),
            Some(TransactionType::Income)
        );
        // Unrecognized token still falls back to the sign
        assert_eq!(
            infer_type(Some("transfer"), Some(-100)),
            Some(TransactionType::Expense)
        );
    }

    #[test]
    fn test_type_unknown_for_zero_or_missing() {
        assert_eq!(infer_type(None, Some(0)), None);
        assert_eq!(infer_type(None, None), None);
        assert_eq!(infer_type(Some("transfer"), None), None);
    }
}
