//! Cell parsing rules shared by the classifier and the normalizer.
//!
//! Both stages must agree exactly: any cell the classifier counts as a date or an amount
//! must parse the same way when rows are normalized.

use crate::table::Cell;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Day-first formats, tried in order. Two-digit-year variants come first because `%Y`
/// would otherwise accept "24" as the year 24.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    // month-first only when the day-first reading is impossible (e.g. 03/25/2024)
    "%m/%d/%Y",
    "%m-%d-%Y",
];

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
];

/// Parse a cell as a calendar date, day-first.
///
/// Returns the date and, when the cell carried one, the time of day. A trailing UTC
/// offset (`Z`, `+00:00`, `-0300`) is accepted and ignored. Numeric cells are never
/// dates.
pub fn parse_when(cell: &Cell) -> Option<(NaiveDate, Option<NaiveTime>)> {
    match cell {
        Cell::Text(s) => parse_when_str(s),
        Cell::Number(_) | Cell::Empty => None,
    }
}

pub fn parse_when_str(s: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (date_part, time_part) = match s.find(['T', ' ']) {
        Some(i) => (&s[..i], s[i + 1..].trim()),
        None => (s, ""),
    };

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())?;

    if time_part.is_empty() {
        return Some((date, None));
    }
    let time_part = strip_offset(time_part);
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time_part, fmt).ok())?;
    Some((date, Some(time)))
}

fn strip_offset(time: &str) -> &str {
    if let Some(rest) = time.strip_suffix(['Z', 'z']) {
        return rest.trim_end();
    }
    if let Some(i) = time.rfind(['+', '-']) {
        let offset = &time[i + 1..];
        let digits = offset.chars().filter(char::is_ascii_digit).count();
        if matches!(digits, 2 | 4) && offset.chars().all(|c| c.is_ascii_digit() || c == ':') {
            return time[..i].trim_end();
        }
    }
    time
}

/// Keep only digits, `.` and `-`.
pub fn strip_amount(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Parse a cell as a signed amount after stripping currency symbols, separators and text.
///
/// "$ -1,500.00" becomes -1500.00. Note that a comma decimal separator is stripped too,
/// so "1.500,25" reads as 1.50025.
pub fn parse_amount(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => parse_amount_str(s),
        Cell::Empty => None,
    }
}

pub fn parse_amount_str(s: &str) -> Option<Decimal> {
    let stripped = strip_amount(s);
    let (negative, body) = match stripped.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, stripped.as_str()),
    };

    // one optional '.', at least one digit, no further '-'
    if body.is_empty()
        || body.contains('-')
        || body.matches('.').count() > 1
        || !body.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }

    let body = body.trim_end_matches('.');
    let normalized = if body.starts_with('.') {
        format!("0{body}")
    } else {
        body.to_string()
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}
