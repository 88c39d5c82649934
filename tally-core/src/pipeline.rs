//! End-to-end analysis: classify → apply overrides → normalize → summarize.

use crate::aggregate::{DateRange, Summary, summarize};
use crate::classifier::{Classification, classify};
use crate::config::EngineConfig;
use crate::counterparty::{CounterpartyExtractor, TitleCasePair};
use crate::direction::{DirectionStrategy, SignDirection, TypeLabelDirection};
use crate::error::{EngineError, Result};
use crate::model::Transaction;
use crate::normalizer::{DropCounts, normalize};
use crate::roles::{Role, RoleMap};
use crate::table::RawTable;
use chrono::NaiveDate;
use serde::Serialize;

/// Everything one run hands to presentation and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub roles: RoleMap,
    /// Sorted by date, time of day, then source row.
    pub transactions: Vec<Transaction>,
    pub dropped: DropCounts,
    /// `None` only when no row survived normalization.
    pub range: Option<DateRange>,
    pub summary: Summary,
}

pub struct Engine {
    config: EngineConfig,
    counterparty: Box<dyn CounterpartyExtractor>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let counterparty = TitleCasePair::new(&config.counterparty)
            .map_err(|e| EngineError::Config(format!("counterparty pattern: {e}")))?;
        Ok(Self {
            config,
            counterparty: Box::new(counterparty),
        })
    }

    /// Replace the counterparty extractor.
    pub fn with_extractor(mut self, extractor: impl CounterpartyExtractor + 'static) -> Self {
        self.counterparty = Box::new(extractor);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify the columns of `table`. Fails only on empty input.
    pub fn classify(&self, table: &RawTable) -> Result<Classification> {
        ensure_not_empty(table)?;
        Ok(classify(table, &self.config.classifier))
    }

    /// Resolve roles: classifier output with `overrides` applied on top.
    ///
    /// Overrides are explicit caller choices and replace whatever the classifier picked
    /// for that role.
    pub fn resolve_roles(&self, table: &RawTable, overrides: &RoleMap) -> Result<RoleMap> {
        let mut roles = self.classify(table)?.roles;
        for (role, column) in overrides.iter() {
            if table.column_index(column).is_none() {
                return Err(EngineError::UnknownColumn {
                    role,
                    name: column.to_string(),
                });
            }
            log::info!("{role} role set explicitly to '{column}'");
            roles.assign(role, column);
        }

        let unresolved = roles.unresolved();
        if !unresolved.is_empty() {
            let candidates = table
                .columns()
                .iter()
                .filter(|c| !matches!(roles.role_of(c), Some(r) if r.is_mandatory()))
                .cloned()
                .collect();
            return Err(EngineError::UnresolvedRoles {
                roles: unresolved,
                candidates,
            });
        }
        Ok(roles)
    }

    /// Canonical transactions for `table` under `roles`, sorted chronologically.
    pub fn normalize(
        &self,
        table: &RawTable,
        roles: &RoleMap,
    ) -> Result<(Vec<Transaction>, DropCounts)> {
        let labels;
        let direction: &dyn DirectionStrategy = if roles.contains(Role::Type) {
            labels = TypeLabelDirection::new(&self.config.direction);
            &labels
        } else {
            &SignDirection
        };

        let mut out = normalize(table, roles, direction, &*self.counterparty)?;
        out.transactions.sort_by_key(|t| (t.date, t.time, t.row));
        Ok((out.transactions, out.dropped))
    }

    /// Full run. `range` defaults to the span of the surviving transactions.
    pub fn analyze(
        &self,
        table: &RawTable,
        overrides: &RoleMap,
        range: Option<DateRange>,
    ) -> Result<Analysis> {
        self.analyze_between(
            table,
            overrides,
            range.map(|r| r.start),
            range.map(|r| r.end),
        )
    }

    /// Full run with independently optional bounds; a missing bound comes from the data.
    pub fn analyze_between(
        &self,
        table: &RawTable,
        overrides: &RoleMap,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Analysis> {
        let roles = self.resolve_roles(table, overrides)?;
        let (transactions, dropped) = self.normalize(table, &roles)?;

        let range = DateRange::resolve(start, end, &transactions);
        let summary = match &range {
            Some(r) => summarize(&transactions, r)?,
            None => Summary::default(),
        };

        log::info!(
            "analyzed {} rows: {} transactions, {} dropped, {} in range",
            table.row_count(),
            transactions.len(),
            dropped.total(),
            summary.count
        );

        Ok(Analysis {
            roles,
            transactions,
            dropped,
            range,
            summary,
        })
    }
}

fn ensure_not_empty(table: &RawTable) -> Result<()> {
    if table.is_empty() {
        return Err(EngineError::EmptyInput {
            rows: table.row_count(),
            columns: table.column_count(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::with_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<Analysis>();
    }

    #[test]
    fn test_empty_input() {
        let err = engine()
            .analyze(&RawTable::new(vec!["a".into()]), &RoleMap::new(), None)
            .unwrap_err();
        assert_eq!(err, EngineError::EmptyInput { rows: 0, columns: 1 });
    }

    #[test]
    fn test_unresolved_lists_free_candidates() {
        let t = table(&["Fecha", "Nota", "Otro"], &[&["03/01/2024", "a", "b"]]);
        let err = engine().analyze(&t, &RoleMap::new(), None).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnresolvedRoles {
                roles: vec![Role::Amount],
                candidates: vec!["Nota".into(), "Otro".into()],
            }
        );
    }

    #[test]
    fn test_override_resolves_and_unknown_override_fails() {
        // half of Saldo parses, below the amount threshold
        let t = table(
            &["Fecha", "Nota", "Saldo"],
            &[&["03/01/2024", "a", "USD 5"], &["04/01/2024", "b", "pendiente"]],
        );
        assert!(matches!(
            engine().analyze(&t, &RoleMap::new(), None),
            Err(EngineError::UnresolvedRoles { .. })
        ));

        let overrides = RoleMap::new().with(Role::Amount, "Saldo");
        let a = engine().analyze(&t, &overrides, None).unwrap();
        assert_eq!(a.roles.get(Role::Amount), Some("Saldo"));
        assert_eq!(a.transactions.len(), 1);
        assert_eq!(a.dropped.bad_amount, 1);

        let overrides = RoleMap::new().with(Role::Amount, "Importe");
        let err = engine().analyze(&t, &overrides, None).unwrap_err();
        assert!(matches!(err, EngineError::UnknownColumn { role: Role::Amount, .. }));
    }

    #[test]
    fn test_transactions_sorted_by_date_then_row() {
        let t = table(
            &["Fecha", "Monto"],
            &[
                &["05/01/2024 10:00", "1"],
                &["04/01/2024", "2"],
                &["05/01/2024 09:00", "3"],
                &["04/01/2024", "4"],
            ],
        );
        let a = engine().analyze(&t, &RoleMap::new(), None).unwrap();
        let rows: Vec<usize> = a.transactions.iter().map(|t| t.row).collect();
        assert_eq!(rows, vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_all_rows_dropped_gives_empty_summary() {
        let t = table(&["Fecha", "Monto"], &[&["01/01/2024", "x"], &["02/01/2024", "y"]]);
        let overrides = RoleMap::new().with(Role::Amount, "Monto");
        let a = engine().analyze(&t, &overrides, None).unwrap();
        assert!(a.transactions.is_empty());
        assert_eq!(a.dropped.bad_amount, 2);
        assert_eq!(a.range, None);
        assert_eq!(a.summary, Summary::default());
    }

    #[test]
    fn test_overflowing_sum_is_an_error_not_a_panic() {
        let max = "79228162514264337593543950335";
        let t = table(&["Fecha", "Monto"], &[&["03/01/2024", max], &["04/01/2024", max]]);
        let err = engine().analyze(&t, &RoleMap::new(), None).unwrap_err();
        assert_eq!(err, EngineError::Overflow { row: 1 });
    }
}
