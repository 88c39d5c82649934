//! Delimited text exports (CSV, semicolon CSV, TSV).
//!
//! The first record is the header. The delimiter is sniffed from the header line:
//!   Fecha;Descripción;Monto
//!   03/01/2024;Pago Juan Perez;-1500

use anyhow::{Context, Result};
use std::path::Path;
use tally_core::{Cell, RawTable};

use crate::cells::{header_names, typed_cell};

const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Most frequent candidate in the first non-blank line; `,` when none appears.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut best = (b',', 0usize);
    for c in CANDIDATES {
        let count = header.bytes().filter(|b| *b == c).count();
        if count > best.1 {
            best = (c, count);
        }
    }
    best.0
}

pub fn parse_delimited_str(text: &str) -> Result<RawTable> {
    parse_delimited_with(text, sniff_delimiter(text))
}

pub fn parse_delimited_with(text: &str, delimiter: u8) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut records = rdr.records();
    let header = match records.next() {
        Some(rec) => rec.context("reading header row")?,
        None => return Ok(RawTable::default()),
    };

    let mut table = RawTable::new(header_names(header.iter()));
    for (i, result) in records.enumerate() {
        let record = result.with_context(|| format!("reading row {}", i + 1))?;
        let row: Vec<Cell> = record.iter().map(typed_cell).collect();
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(row);
    }

    log::debug!(
        "delimited ('{}'): {} columns, {} rows",
        delimiter as char,
        table.column_count(),
        table.row_count()
    );
    Ok(table)
}

pub fn read_delimited(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("opening {}", path.display()))?;
    parse_delimited_str(&text).with_context(|| format!("parsing {}", path.display()))
}
