// 🏷️ CUSIP Suffix Derivation
// Encodes an instrument's maturity date into two characters
//
// issue date (epoch millis) + holding days -> maturity date
// maturity month -> 7th character, maturity day -> 8th character
//
// Pure functions: no state, no ledger access.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};

use crate::error::CusipError;

// ============================================================================
// LOOKUP TABLES
// ============================================================================

/// 7th character codes, keyed 1..=24 (A-Z without I and O).
///
/// Only keys 1..=12 are ever reached because the table is indexed by the
/// maturity month. The remaining twelve entries are kept as enumerated.
pub const SEVENTH_CHAR_CODES: [char; 24] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', //
    'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// 8th character codes, keyed 1..=31 by day of month.
///
/// 1-9 map to digits, 10-31 to letters with I, L and O skipped.
pub const EIGHTH_CHAR_CODES: [char; 31] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', //
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'M', //
    'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
];

fn lookup(table: &'static str, codes: &[char], key: u32) -> Result<char, CusipError> {
    if key == 0 {
        return Err(CusipError::SuffixLookupOutOfRange { table, key });
    }
    codes
        .get(key as usize - 1)
        .copied()
        .ok_or(CusipError::SuffixLookupOutOfRange { table, key })
}

/// Look up the 7th character for a table key (1..=24)
pub fn seventh_char(key: u32) -> Result<char, CusipError> {
    lookup("seventh", &SEVENTH_CHAR_CODES, key)
}

/// Look up the 8th character for a day of month (1..=31)
pub fn eighth_char(key: u32) -> Result<char, CusipError> {
    lookup("eighth", &EIGHTH_CHAR_CODES, key)
}

// ============================================================================
// DATE ARITHMETIC
// ============================================================================

/// Parse an epoch-millis string into a UTC instant
pub fn issue_instant(issue_timestamp_millis: &str) -> Result<DateTime<Utc>, CusipError> {
    let invalid = || CusipError::InvalidTimestamp(issue_timestamp_millis.to_string());

    let millis: i64 = issue_timestamp_millis.parse().map_err(|_| invalid())?;
    Utc.timestamp_millis_opt(millis).single().ok_or_else(invalid)
}

/// Calendar date of maturity: issue date plus `holding_days` calendar days
///
/// Negative holding periods move backwards. Month and year rollover follow
/// the proleptic Gregorian calendar.
pub fn maturity_date(issue_timestamp_millis: &str, holding_days: i64) -> Result<NaiveDate, CusipError> {
    let issued = issue_instant(issue_timestamp_millis)?.date_naive();
    let days = Days::new(holding_days.unsigned_abs());

    let maturity = if holding_days >= 0 {
        issued.checked_add_days(days)
    } else {
        issued.checked_sub_days(days)
    };

    maturity.ok_or_else(|| {
        CusipError::InvalidTimestamp(format!(
            "{} + {} days overflows the calendar",
            issue_timestamp_millis, holding_days
        ))
    })
}

// ============================================================================
// SUFFIX
// ============================================================================

/// Derive the two-character CUSIP suffix for an instrument
///
/// Example: issued 2024-01-15 with a 366 day term matures 2025-01-15,
/// month 1 -> 'A', day 15 -> 'F', suffix "AF".
pub fn derive_suffix(issue_timestamp_millis: &str, holding_days: i64) -> Result<String, CusipError> {
    let maturity = maturity_date(issue_timestamp_millis, holding_days)?;

    let mut suffix = String::with_capacity(2);
    suffix.push(seventh_char(maturity.month())?);
    suffix.push(eighth_char(maturity.day())?);
    Ok(suffix)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// 2024-01-15T00:00:00Z
    const JAN_15_2024: &str = "1705276800000";

    #[test]
    fn test_leap_year_rollover_maturity_date() {
        let maturity = maturity_date(JAN_15_2024, 366).unwrap();
        assert_eq!(maturity, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!((maturity.month(), maturity.day()), (1, 15));

        assert_eq!(derive_suffix(JAN_15_2024, 366).unwrap(), "AF");
    }

    #[test]
    fn test_crosses_leap_day() {
        // 2024-01-15 + 45 days = 2024-02-29
        let maturity = maturity_date(JAN_15_2024, 45).unwrap();
        assert_eq!((maturity.month(), maturity.day()), (2, 29));
        assert_eq!(derive_suffix(JAN_15_2024, 45).unwrap(), "BW");
    }

    #[test]
    fn test_month_end_and_year_end() {
        // 2024-01-15 + 351 days = 2024-12-31
        assert_eq!(derive_suffix(JAN_15_2024, 351).unwrap(), "MY");
        // 2024-01-15 + 0 days
        assert_eq!(derive_suffix(JAN_15_2024, 0).unwrap(), "AF");
        // 2024-01-15 - 15 days = 2023-12-31
        assert_eq!(derive_suffix(JAN_15_2024, -15).unwrap(), "MY");
    }

    #[test]
    fn test_intraday_millis_are_truncated_to_date() {
        // 2024-01-15T23:59:59.999Z + 1 day = 2024-01-16
        assert_eq!(derive_suffix("1705363199999", 1).unwrap(), "AG");
    }

    #[test]
    fn test_deterministic() {
        let first = derive_suffix(JAN_15_2024, 90).unwrap();
        for _ in 0..10 {
            assert_eq!(derive_suffix(JAN_15_2024, 90).unwrap(), first);
        }
    }

    #[test]
    fn test_invalid_timestamp() {
        for input in ["", "abc", "12.5", "99999999999999999999"] {
            match derive_suffix(input, 30) {
                Err(CusipError::InvalidTimestamp(raw)) => assert_eq!(raw, input),
                other => panic!("expected InvalidTimestamp for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_padded_timestamp_is_invalid() {
        for input in [" 1705276800000", "1705276800000 ", "+1705276800000x"] {
            assert!(matches!(
                derive_suffix(input, 30),
                Err(CusipError::InvalidTimestamp(_))
            ));
        }
    }

    #[test]
    fn test_unrepresentable_timestamp() {
        assert!(matches!(
            derive_suffix(&i64::MAX.to_string(), 1),
            Err(CusipError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_maturity_overflow() {
        assert!(matches!(
            derive_suffix(JAN_15_2024, i64::MAX),
            Err(CusipError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_out_of_range_lookup() {
        assert_eq!(
            eighth_char(32),
            Err(CusipError::SuffixLookupOutOfRange { table: "eighth", key: 32 })
        );
        assert_eq!(
            eighth_char(0),
            Err(CusipError::SuffixLookupOutOfRange { table: "eighth", key: 0 })
        );
        assert_eq!(
            seventh_char(25),
            Err(CusipError::SuffixLookupOutOfRange { table: "seventh", key: 25 })
        );
    }

    #[test]
    fn test_table_contents() {
        assert_eq!(seventh_char(1).unwrap(), 'A');
        assert_eq!(seventh_char(9).unwrap(), 'J');
        assert_eq!(seventh_char(12).unwrap(), 'M');
        assert_eq!(seventh_char(24).unwrap(), 'Z');

        assert_eq!(eighth_char(9).unwrap(), '9');
        assert_eq!(eighth_char(10).unwrap(), 'A');
        assert_eq!(eighth_char(18).unwrap(), 'J');
        assert_eq!(eighth_char(19).unwrap(), 'K');
        assert_eq!(eighth_char(20).unwrap(), 'M');
        assert_eq!(eighth_char(30).unwrap(), 'X');
        assert_eq!(eighth_char(31).unwrap(), 'Y');

        assert!(!SEVENTH_CHAR_CODES.contains(&'I'));
        assert!(!SEVENTH_CHAR_CODES.contains(&'O'));
        assert!(!EIGHTH_CHAR_CODES.contains(&'I'));
        assert!(!EIGHTH_CHAR_CODES.contains(&'O'));
        assert!(!EIGHTH_CHAR_CODES.contains(&'L'));
    }
}
