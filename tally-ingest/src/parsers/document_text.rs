//! Tables in text extracted from documents (e.g. `pdftotext -layout`).
//!
//! Columns are separated by runs of two or more spaces or by tabs. Pages are separated by
//! form feeds and each page starts with its own header line:
//!   Fecha        Concepto                 Importe
//!   03/01/2024   Pago Juan Perez          -1,500.00

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use tally_core::{Cell, RawTable};

use crate::cells::{header_names, typed_cell};

/// Parse every page and concatenate the resulting tables.
pub fn parse_document_text(text: &str) -> Result<RawTable> {
    let sep = Regex::new(r"\t+|\s{2,}")?;
    let pages: Vec<RawTable> = text
        .split('\u{c}')
        .filter_map(|page| parse_page(page, &sep))
        .collect();
    log::debug!("document text: {} page table(s)", pages.len());
    Ok(RawTable::concat(pages))
}

fn parse_page(page: &str, sep: &Regex) -> Option<RawTable> {
    let mut lines = page.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next()?;
    let mut table = RawTable::new(header_names(sep.split(header.trim())));
    for line in lines {
        let row: Vec<Cell> = sep.split(line.trim()).map(typed_cell).collect();
        table.push_row(row);
    }
    Some(table)
}

pub fn read_document_text(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("opening {}", path.display()))?;
    parse_document_text(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_concatenated() {
        let text = "\
Fecha        Concepto                 Importe
03/01/2024   Pago Juan Perez          -1,500.00
04/01/2024   Deposito                 2,000.00
\u{c}
Fecha        Importe     Referencia
20/01/2024   -300        0012
";
        let t = parse_document_text(text).unwrap();
        assert_eq!(t.columns(), &["Fecha", "Concepto", "Importe", "Referencia"]);
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.rows()[0][1], Cell::Text("Pago Juan Perez".into()));
        assert_eq!(t.rows()[0][2], Cell::Text("-1,500.00".into()));
        assert_eq!(t.rows()[2][1], Cell::Empty);
        assert_eq!(t.rows()[2][3], Cell::Text("0012".into()));
    }

    #[test]
    fn test_blank_document() {
        assert!(parse_document_text("\n\n").unwrap().is_empty());
    }
}
