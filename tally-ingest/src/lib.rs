//! tally-ingest: turn delimited exports and document text into a [`RawTable`].

pub mod cells;
pub mod parsers;

use anyhow::{Result, bail};
use std::path::Path;
use tally_core::RawTable;

pub use parsers::delimited::{parse_delimited_str, read_delimited, sniff_delimiter};
pub use parsers::document_text::{parse_document_text, read_document_text};

/// How a source file is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Delimited,
    DocumentText,
}

impl SourceKind {
    /// Guess from the extension: csv/tsv are delimited, txt is document text.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "tsv" => Some(SourceKind::Delimited),
            "txt" => Some(SourceKind::DocumentText),
            _ => None,
        }
    }
}

/// Load `path` as a raw table. `kind` overrides the extension guess.
pub fn load_table(path: impl AsRef<Path>, kind: Option<SourceKind>) -> Result<RawTable> {
    let path = path.as_ref();
    let Some(kind) = kind.or_else(|| SourceKind::from_path(path)) else {
        bail!(
            "unsupported file type: {} (expected .csv, .tsv or .txt)",
            path.display()
        );
    };

    let table = match kind {
        SourceKind::Delimited => read_delimited(path)?,
        SourceKind::DocumentText => read_document_text(path)?,
    };
    log::info!(
        "loaded {} ({:?}): {} columns, {} rows",
        path.display(),
        kind,
        table.column_count(),
        table.row_count()
    );
    Ok(table)
}
