//! Typing of raw text fields into [`Cell`]s.

use rust_decimal::Decimal;
use std::str::FromStr;
use tally_core::Cell;

/// Blank → Empty, plain decimal literal → Number, anything else → trimmed Text.
///
/// Literals with a leading zero ("0012") stay text so identifiers keep their digits.
pub fn typed_cell(field: &str) -> Cell {
    let s = field.trim();
    if s.is_empty() {
        return Cell::Empty;
    }
    if is_plain_number(s) {
        if let Ok(n) = Decimal::from_str(s) {
            return Cell::Number(n);
        }
    }
    Cell::Text(s.to_string())
}

fn is_plain_number(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if !digits(int) || frac.is_some_and(|f| !digits(f)) {
        return false;
    }
    int == "0" || !int.starts_with('0')
}

/// Header names: trimmed, blanks become `column_N`, duplicates get `_2`, `_3`, ...
pub fn header_names<'a>(fields: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (i, field) in fields.into_iter().enumerate() {
        let base = match field.trim().trim_start_matches('\u{feff}').trim() {
            "" => format!("column_{}", i + 1),
            name => name.to_string(),
        };
        let mut name = base.clone();
        let mut n = 2;
        while out.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        out.push(name);
    }
    out
}
