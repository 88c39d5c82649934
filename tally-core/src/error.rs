//! Engine error type.

use crate::roles::Role;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The table has no rows or no columns.
    #[error("input table is empty ({rows} rows, {columns} columns)")]
    EmptyInput { rows: usize, columns: usize },

    /// Mandatory roles without a qualifying column. The caller picks from `candidates`
    /// and retries with explicit overrides.
    #[error("could not resolve column for {}; candidates: {}", fmt_roles(.roles), .candidates.join(", "))]
    UnresolvedRoles {
        roles: Vec<Role>,
        candidates: Vec<String>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no column named '{name}' (requested for role {role})")]
    UnknownColumn { role: Role, name: String },

    /// A running sum left the representable decimal range at source row `row`.
    #[error("amount sum overflowed at row {row}")]
    Overflow { row: usize },
}

fn fmt_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, EngineError>;
