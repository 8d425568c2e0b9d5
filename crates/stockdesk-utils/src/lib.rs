//! Formatting helpers for table output

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Render a server timestamp with a chrono pattern.
///
/// Input that is not a recognizable timestamp, or a pattern chrono cannot
/// render, gives back `raw` unchanged.
pub fn format_date(raw: &str, pattern: &str) -> String {
    let Some(dt) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    let mut out = String::new();
    match write!(out, "{}", dt.format(pattern)) {
        Ok(()) => out,
        Err(_) => raw.to_string(),
    }
}

/// `YYYY-MM-DD`, as date inputs and the API expect
pub fn format_date_for_input(raw: &str) -> String {
    format_date(raw, "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567u64), "1,234,567");
        assert_eq!(format_number(-25000i64), "-25,000");
    }

    #[test]
    fn test_format_date_variants() {
        let pattern = "%B %-d, %Y at %-I %p";
        assert_eq!(
            format_date("2024-03-05T14:30:00.000Z", pattern),
            "March 5, 2024 at 2 PM"
        );
        assert_eq!(format_date("2024-03-05T09:00:00", pattern), "March 5, 2024 at 9 AM");
        assert_eq!(format_date("2024-03-05", "%d/%m/%Y"), "05/03/2024");
    }

    #[test]
    fn test_unparseable_date_is_unchanged() {
        assert_eq!(format_date("yesterday", "%Y"), "yesterday");
        assert_eq!(format_date("", "%Y"), "");
    }

    #[test]
    fn test_bad_pattern_falls_back_to_raw() {
        assert_eq!(format_date("2024-03-05", "%Q"), "2024-03-05");
        assert_eq!(format_date("2024-03-05T09:00:00Z", "%Y-%Q"), "2024-03-05T09:00:00Z");
    }

    #[test]
    fn test_format_date_for_input() {
        assert_eq!(format_date_for_input("2024-12-31T23:59:59Z"), "2024-12-31");
        assert_eq!(format_date_for_input("2024-01-02"), "2024-01-02");
    }
}
