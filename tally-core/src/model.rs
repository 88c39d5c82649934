//! Canonical transaction record.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inflow,
    Outflow,
}

/// One normalized row. `amount` is never negative; the sign lives in `direction`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Time of day when the source carried one; only used for ordering.
    pub time: Option<NaiveTime>,
    pub amount: Decimal,
    pub direction: Direction,
    /// Raw value of the type column, when there is one.
    pub type_label: Option<String>,
    pub description: Option<String>,
    pub counterparty: Option<String>,
    pub reference: Option<String>,
    /// Zero-based index of the source row.
    pub row: usize,
}

impl Transaction {
    pub fn is_inflow(&self) -> bool {
        self.direction == Direction::Inflow
    }

    pub fn is_outflow(&self) -> bool {
        self.direction == Direction::Outflow
    }

    /// Amount with the direction's sign applied.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Inflow => self.amount,
            Direction::Outflow => -self.amount,
        }
    }
}
