//! ISO ordering
//!
//! ISO ratings are stored as text and ordered by their leading integer,
//! read the way a browser's `parseInt` reads it.

use std::cmp::Ordering;

use crate::catalog::DevelopmentRecord;

/// Leading integer of `text`, or `None` where `parseInt` would yield NaN.
///
/// Skips leading whitespace, accepts one sign, treats a `0x`/`0X` prefix as
/// hexadecimal and stops at the first character that is not a digit.
/// `"400"` is 400, `" 12800 "` is 12800, `"40*"` is 40, `"N/A"` is `None`.
pub fn parse_int(text: &str) -> Option<f64> {
    let trimmed = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = if unsigned.starts_with("0x") || unsigned.starts_with("0X") {
        (16, &unsigned[2..])
    } else {
        (10, unsigned)
    };

    let mut value = 0.0_f64;
    let mut seen = false;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => {
                value = value * radix as f64 + d as f64;
                seen = true;
            }
            None => break,
        }
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Ascending order of two ISO strings. Unparseable values go last.
pub fn compare_iso(a: &str, b: &str) -> Ordering {
    match (parse_int(a), parse_int(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort by numeric ISO. Ties keep their input order.
pub fn sort_by_iso(records: &mut [DevelopmentRecord]) {
    records.sort_by(|a, b| compare_iso(&a.iso, &b.iso));
}
