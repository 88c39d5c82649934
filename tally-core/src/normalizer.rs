//! Record normalizer: raw rows + role map → canonical transactions.
//!
//! Rows whose date or amount does not parse are dropped and counted, never reported as
//! errors.

use crate::counterparty::CounterpartyExtractor;
use crate::direction::DirectionStrategy;
use crate::error::{EngineError, Result};
use crate::model::Transaction;
use crate::parse::{parse_amount, parse_when};
use crate::roles::{Role, RoleMap};
use crate::table::{Cell, RawTable};
use serde::{Deserialize, Serialize};

/// Rows left out of the canonical sequence, by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCounts {
    pub bad_date: usize,
    pub bad_amount: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.bad_date + self.bad_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    pub transactions: Vec<Transaction>,
    pub dropped: DropCounts,
}

/// Column positions for every resolved role.
struct Columns {
    date: usize,
    amount: usize,
    kind: Option<usize>,
    description: Option<usize>,
    reference: Option<usize>,
}

impl Columns {
    fn locate(table: &RawTable, roles: &RoleMap) -> Result<Self> {
        let unresolved = roles.unresolved();
        if !unresolved.is_empty() {
            return Err(EngineError::UnresolvedRoles {
                roles: unresolved,
                candidates: table.columns().to_vec(),
            });
        }

        let find = |role: Role| -> Result<Option<usize>> {
            match roles.get(role) {
                None => Ok(None),
                Some(name) => table
                    .column_index(name)
                    .map(Some)
                    .ok_or_else(|| EngineError::UnknownColumn {
                        role,
                        name: name.to_string(),
                    }),
            }
        };

        Ok(Self {
            date: find(Role::Date)?.unwrap_or_default(),
            amount: find(Role::Amount)?.unwrap_or_default(),
            kind: find(Role::Type)?,
            description: find(Role::Description)?,
            reference: find(Role::CounterpartyRef)?,
        })
    }
}

/// Convert every row of `table` using the columns named in `roles`.
///
/// `direction` is the strategy for the table's shape: the caller picks the type-label
/// strategy when a type column is resolved and the sign strategy otherwise.
pub fn normalize(
    table: &RawTable,
    roles: &RoleMap,
    direction: &dyn DirectionStrategy,
    extractor: &dyn CounterpartyExtractor,
) -> Result<Normalized> {
    let cols = Columns::locate(table, roles)?;
    let mut transactions = Vec::with_capacity(table.row_count());
    let mut dropped = DropCounts::default();

    for (row_idx, row) in table.rows().iter().enumerate() {
        let Some((date, time)) = parse_when(&row[cols.date]) else {
            log::warn!(
                "row {row_idx}: dropped, unparseable date '{}'",
                row[cols.date].as_text()
            );
            dropped.bad_date += 1;
            continue;
        };

        let Some(signed) = parse_amount(&row[cols.amount]) else {
            log::warn!(
                "row {row_idx}: dropped, unparseable amount '{}'",
                row[cols.amount].as_text()
            );
            dropped.bad_amount += 1;
            continue;
        };

        let type_label = cols.kind.and_then(|i| row[i].non_empty_text());
        let description = cols.description.and_then(|i| verbatim(&row[i]));
        let reference = cols.reference.and_then(|i| verbatim(&row[i]));
        let counterparty = description
            .as_deref()
            .and_then(|d| extractor.extract(d));

        transactions.push(Transaction {
            date,
            time,
            amount: signed.abs(),
            direction: direction.resolve(signed, type_label.as_deref()),
            type_label,
            description,
            counterparty,
            reference,
            row: row_idx,
        });
    }

    if dropped.total() > 0 {
        log::warn!(
            "dropped {} of {} rows ({} bad date, {} bad amount)",
            dropped.total(),
            table.row_count(),
            dropped.bad_date,
            dropped.bad_amount
        );
    }

    Ok(Normalized {
        transactions,
        dropped,
    })
}

fn verbatim(cell: &Cell) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.as_text().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CounterpartyConfig, DirectionConfig};
    use crate::counterparty::TitleCasePair;
    use crate::direction::{SignDirection, TypeLabelDirection};
    use crate::model::Direction;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::with_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
                .collect(),
        )
    }

    fn extractor() -> TitleCasePair {
        TitleCasePair::new(&CounterpartyConfig::default()).unwrap()
    }

    fn basic_roles() -> RoleMap {
        RoleMap::new()
            .with(Role::Date, "Fecha")
            .with(Role::Amount, "Monto")
            .with(Role::Description, "Detalle")
    }

    #[test]
    fn test_sign_strategy() {
        let t = table(
            &["Fecha", "Monto", "Detalle"],
            &[
                &["03/01/2024", "-1500", "Pago Juan Perez"],
                &["04/01/2024", "2000", "Deposito"],
            ],
        );
        let out = normalize(&t, &basic_roles(), &SignDirection, &extractor()).unwrap();
        assert_eq!(out.dropped, DropCounts::default());
        assert_eq!(out.transactions.len(), 2);

        let first = &out.transactions[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(first.amount, Decimal::new(1500, 0));
        assert_eq!(first.direction, Direction::Outflow);
        assert_eq!(first.counterparty.as_deref(), Some("Juan Perez"));
        assert_eq!(first.signed_amount(), Decimal::new(-1500, 0));

        let second = &out.transactions[1];
        assert_eq!(second.direction, Direction::Inflow);
        assert_eq!(second.counterparty, None);
        assert_eq!(second.description.as_deref(), Some("Deposito"));
    }

    #[test]
    fn test_type_label_strategy_keeps_label_and_abs_amount() {
        let t = table(
            &["Fecha", "Monto", "Tipo"],
            &[&["03/01/2024", "1500", "Egreso"], &["04/01/2024", "-20", "???"]],
        );
        let roles = RoleMap::new()
            .with(Role::Date, "Fecha")
            .with(Role::Amount, "Monto")
            .with(Role::Type, "Tipo");
        let strategy = TypeLabelDirection::new(&DirectionConfig::default());
        let out = normalize(&t, &roles, &strategy, &extractor()).unwrap();

        assert_eq!(out.transactions[0].direction, Direction::Outflow);
        assert_eq!(out.transactions[0].amount, Decimal::new(1500, 0));
        assert_eq!(out.transactions[0].type_label.as_deref(), Some("Egreso"));
        assert_eq!(out.transactions[1].direction, Direction::Outflow);
        assert_eq!(out.transactions[1].amount, Decimal::new(20, 0));
    }

    #[test]
    fn test_bad_rows_are_counted_not_fatal() {
        let t = table(
            &["Fecha", "Monto", "Detalle"],
            &[
                &["not-a-date", "10", "x"],
                &["05/01/2024", "", "y"],
                &["06/01/2024", "$ 1,000.50", "z"],
            ],
        );
        let out = normalize(&t, &basic_roles(), &SignDirection, &extractor()).unwrap();
        assert_eq!(out.dropped, DropCounts { bad_date: 1, bad_amount: 1 });
        assert_eq!(out.transactions.len(), 1);
        assert_eq!(out.transactions[0].amount, Decimal::new(100050, 2));
        assert_eq!(out.transactions[0].row, 2);
    }

    #[test]
    fn test_reference_copied_verbatim() {
        let t = RawTable::with_rows(
            vec!["Fecha".into(), "Monto".into(), "Cuenta".into()],
            vec![vec![
                Cell::from("03/01/2024"),
                Cell::Number(Decimal::new(5, 0)),
                Cell::from(" 0012-34 "),
            ]],
        );
        let roles = RoleMap::new()
            .with(Role::Date, "Fecha")
            .with(Role::Amount, "Monto")
            .with(Role::CounterpartyRef, "Cuenta");
        let out = normalize(&t, &roles, &SignDirection, &extractor()).unwrap();
        assert_eq!(out.transactions[0].reference.as_deref(), Some(" 0012-34 "));
        assert_eq!(out.transactions[0].description, None);
    }

    #[test]
    fn test_missing_roles_and_unknown_columns() {
        let t = table(&["Fecha", "Monto"], &[&["03/01/2024", "1"]]);
        let err = normalize(
            &t,
            &RoleMap::new().with(Role::Date, "Fecha"),
            &SignDirection,
            &extractor(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::UnresolvedRoles { ref roles, .. } if roles == &[Role::Amount]));

        let roles = RoleMap::new()
            .with(Role::Date, "Fecha")
            .with(Role::Amount, "Importe");
        let err = normalize(&t, &roles, &SignDirection, &extractor()).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownColumn {
                role: Role::Amount,
                name: "Importe".into()
            }
        );
    }

    #[test]
    fn test_input_table_untouched() {
        let t = table(&["Fecha", "Monto"], &[&["03/01/2024", "-1"]]);
        let before = t.clone();
        let roles = RoleMap::new().with(Role::Date, "Fecha").with(Role::Amount, "Monto");
        normalize(&t, &roles, &SignDirection, &extractor()).unwrap();
        assert_eq!(t, before);
    }
}
