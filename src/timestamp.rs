// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Migration filename timestamps
//!
//! A migration filename starts with `YYYY-MM-DDTHHMMSS` followed by any
//! suffix, e.g. `2024-01-16T020000_add_bitcoin.txt`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Width of the timestamp prefix
pub const TIMESTAMP_LEN: usize = 17;

/// Shape of the prefix: `0` marks a digit, anything else a literal
const PATTERN: &[u8; TIMESTAMP_LEN] = b"0000-00-00T000000";

/// Parse the timestamp prefix of a migration filename
///
/// Returns `None` when the prefix is missing, malformed or not a real
/// calendar date and time (month 13, April 31, Feb 29 outside leap years,
/// hour 24, minute or second 60).
#[must_use]
pub fn parse_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let bytes = filename.as_bytes();
    if bytes.len() < TIMESTAMP_LEN {
        return None;
    }

    let shape_ok = PATTERN.iter().zip(bytes).all(|(&p, &b)| match p {
        b'0' => b.is_ascii_digit(),
        literal => b == literal,
    });
    if !shape_ok {
        return None;
    }

    // The prefix is pure ASCII from here on
    let field = |range: std::ops::Range<usize>| filename[range].parse::<u32>().ok();

    let year = i32::try_from(field(0..4)?).ok()?;
    if year < 1 {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, field(5..7)?, field(8..10)?)?;
    let time = NaiveTime::from_hms_opt(field(11..13)?, field(13..15)?, field(15..17)?)?;

    Some(NaiveDateTime::new(date, time))
}

/// Whether `filename` begins with a valid migration timestamp
#[must_use]
pub fn has_valid_timestamp(filename: &str) -> bool {
    parse_timestamp(filename).is_some()
}
