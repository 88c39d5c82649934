//! Column classifier: recover semantic roles from an untyped table.
//!
//! Date and amount are found by content (parse success rate above a threshold, first
//! qualifying column wins). The date rate is over non-empty cells; the amount rate is
//! over every row whose date parsed. Type, description and reference are found by
//! column-name keywords.

use crate::config::{ClassifierConfig, fold};
use crate::parse::{parse_amount, parse_when};
use crate::roles::{Role, RoleMap};
use crate::table::{Cell, RawTable};
use serde::{Deserialize, Serialize};

/// Parse statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub non_empty: usize,
    pub date_fraction: f64,
    pub amount_fraction: f64,
}

/// Outcome of classification. Never an error: missing mandatory roles are listed in
/// `unresolved` for the caller to settle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub roles: RoleMap,
    pub unresolved: Vec<Role>,
    pub profiles: Vec<ColumnProfile>,
}

pub fn classify(table: &RawTable, cfg: &ClassifierConfig) -> Classification {
    let dates: Vec<(usize, f64)> = (0..table.column_count())
        .map(|i| date_stats(table, i))
        .collect();
    let date_idx = dates.iter().position(|(_, f)| *f > cfg.date_threshold);

    // Amounts are scored over the rows that carry a date; blank cells count as misses.
    let dated: Vec<&Vec<Cell>> = table
        .rows()
        .iter()
        .filter(|row| date_idx.is_none_or(|d| parse_when(&row[d]).is_some()))
        .collect();

    let profiles: Vec<ColumnProfile> = dates
        .iter()
        .enumerate()
        .map(|(i, &(non_empty, date_fraction))| {
            let amounts = dated
                .iter()
                .filter(|row| parse_amount(&row[i]).is_some())
                .count();
            ColumnProfile {
                name: table.columns()[i].clone(),
                non_empty,
                date_fraction,
                amount_fraction: fraction(amounts, dated.len()),
            }
        })
        .collect();

    let mut roles = RoleMap::new();

    if let Some(i) = date_idx {
        let col = &profiles[i].name;
        log::debug!("date role -> '{col}'");
        roles = roles.with(Role::Date, col.clone());
    }

    let amount_col = profiles
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != date_idx)
        .find(|(_, p)| p.amount_fraction > cfg.amount_threshold)
        .map(|(_, p)| p.name.clone());
    if let Some(col) = amount_col {
        log::debug!("amount role -> '{col}'");
        roles = roles.with(Role::Amount, col);
    }

    for name in table.columns() {
        if roles.role_of(name).is_some() {
            continue;
        }
        let folded = fold(name);
        let Some(role) = Role::KEYWORD
            .into_iter()
            .find(|r| matches_keywords(&folded, keywords_for(cfg, *r)))
        else {
            continue;
        };
        if let Some(holder) = roles.get(role) {
            log::debug!("'{name}' matches {role}, already held by '{holder}'");
            continue;
        }
        log::debug!("{role} role -> '{name}' (keyword)");
        roles = roles.with(role, name.clone());
    }

    let unresolved = roles.unresolved();
    if !unresolved.is_empty() {
        log::debug!("unresolved mandatory roles: {unresolved:?}");
    }

    Classification {
        roles,
        unresolved,
        profiles,
    }
}

/// Non-empty cell count and the fraction of those that parse as dates.
fn date_stats(table: &RawTable, index: usize) -> (usize, f64) {
    let mut non_empty = 0usize;
    let mut dates = 0usize;
    for cell in table.column_cells(index).filter(|c| !c.is_empty()) {
        non_empty += 1;
        if parse_when(cell).is_some() {
            dates += 1;
        }
    }
    (non_empty, fraction(dates, non_empty))
}

fn fraction(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

fn keywords_for(cfg: &ClassifierConfig, role: Role) -> &[String] {
    match role {
        Role::Type => &cfg.type_keywords,
        Role::Description => &cfg.description_keywords,
        Role::CounterpartyRef => &cfg.reference_keywords,
        Role::Date | Role::Amount => &[],
    }
}

fn matches_keywords(folded_name: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| folded_name.contains(&fold(k)))
}
