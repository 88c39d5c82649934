//! Aggregation over a date range: totals plus daily, fortnightly and monthly buckets.
//!
//! Every call rebuilds its maps from the filtered transactions. Amounts are exact
//! decimals and buckets are ordered maps, so the result does not depend on input order.

use crate::bucket::{FortnightKey, MonthKey};
use crate::error::{EngineError, Result};
use crate::model::{Direction, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive calendar-date range. A transaction at any time on `end` is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[min(date), max(date)]` over `txns`, or `None` when there are none.
    pub fn spanning(txns: &[Transaction]) -> Option<Self> {
        let start = txns.iter().map(|t| t.date).min()?;
        let end = txns.iter().map(|t| t.date).max()?;
        Some(Self { start, end })
    }

    /// Fill in whichever bound is missing from the span of `txns`.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        txns: &[Transaction],
    ) -> Option<Self> {
        let span = Self::spanning(txns);
        let start = start.or(span.map(|s| s.start))?;
        let end = end.or(span.map(|s| s.end))?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Inflow and outflow sums for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub inflow: Decimal,
    pub outflow: Decimal,
}

impl Flow {
    pub fn new(inflow: Decimal, outflow: Decimal) -> Self {
        Self { inflow, outflow }
    }

    pub fn net(&self) -> Decimal {
        self.inflow - self.outflow
    }

    fn add(&mut self, txn: &Transaction) -> Result<()> {
        let slot = match txn.direction {
            Direction::Inflow => &mut self.inflow,
            Direction::Outflow => &mut self.outflow,
        };
        *slot = checked_sum(*slot, txn)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub totals: Totals,
    pub daily: BTreeMap<NaiveDate, Flow>,
    pub fortnightly: BTreeMap<FortnightKey, Flow>,
    pub monthly: BTreeMap<MonthKey, Flow>,
    /// Outflow per description; transactions without a description are left out.
    pub outflow_by_description: BTreeMap<String, Decimal>,
    /// Number of transactions inside the range.
    pub count: usize,
}

/// Totals and buckets for the transactions inside `range`.
///
/// Fails with [`EngineError::Overflow`] when a sum leaves the decimal range. Bucket sums
/// never exceed the totals, so checking every addition is enough.
pub fn summarize(txns: &[Transaction], range: &DateRange) -> Result<Summary> {
    let mut total = Flow::default();
    let mut summary = Summary::default();

    for txn in txns.iter().filter(|t| range.contains(t.date)) {
        summary.count += 1;
        total.add(txn)?;
        summary.daily.entry(txn.date).or_default().add(txn)?;
        summary
            .fortnightly
            .entry(FortnightKey::of(txn.date))
            .or_default()
            .add(txn)?;
        summary
            .monthly
            .entry(MonthKey::of(txn.date))
            .or_default()
            .add(txn)?;

        if let (Direction::Outflow, Some(desc)) = (txn.direction, &txn.description) {
            let slot = summary
                .outflow_by_description
                .entry(desc.clone())
                .or_default();
            *slot = checked_sum(*slot, txn)?;
        }
    }

    // both sides are non-negative, so the difference stays in range
    summary.totals = Totals {
        inflow: total.inflow,
        outflow: total.outflow,
        balance: total.net(),
    };
    Ok(summary)
}

fn checked_sum(acc: Decimal, txn: &Transaction) -> Result<Decimal> {
    acc.checked_add(txn.amount)
        .ok_or(EngineError::Overflow { row: txn.row })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::Half;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(date: NaiveDate, amount: i64, direction: Direction, desc: Option<&str>) -> Transaction {
        Transaction {
            date,
            time: None,
            amount: Decimal::new(amount, 0),
            direction,
            type_label: None,
            description: desc.map(str::to_string),
            counterparty: None,
            reference: None,
            row: 0,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(ymd(2024, 1, 3), 1500, Direction::Outflow, Some("Pago Juan Perez")),
            txn(ymd(2024, 1, 4), 2000, Direction::Inflow, Some("Deposito")),
            txn(ymd(2024, 1, 20), 300, Direction::Outflow, Some("Luz")),
            txn(ymd(2024, 2, 1), 100, Direction::Outflow, None),
        ]
    }

    #[test]
    fn test_totals_and_buckets() {
        let txns = sample();
        let range = DateRange::spanning(&txns).unwrap();
        let s = summarize(&txns, &range).unwrap();

        assert_eq!(s.count, 4);
        assert_eq!(s.totals.inflow, Decimal::new(2000, 0));
        assert_eq!(s.totals.outflow, Decimal::new(1900, 0));
        assert_eq!(s.totals.balance, Decimal::new(100, 0));

        let h1 = s.fortnightly[&FortnightKey::new(2024, 1, Half::First)];
        assert_eq!(h1, Flow::new(Decimal::new(2000, 0), Decimal::new(1500, 0)));
        let h2 = s.fortnightly[&FortnightKey::new(2024, 1, Half::Second)];
        assert_eq!(h2, Flow::new(Decimal::ZERO, Decimal::new(300, 0)));

        assert_eq!(s.monthly.len(), 2);
        assert_eq!(s.daily[&ymd(2024, 1, 4)].outflow, Decimal::ZERO);
        assert_eq!(s.outflow_by_description.len(), 2);
        assert_eq!(s.outflow_by_description["Luz"], Decimal::new(300, 0));
    }

    #[test]
    fn test_range_is_inclusive() {
        let txns = sample();
        let s = summarize(&txns, &DateRange::new(ymd(2024, 1, 3), ymd(2024, 1, 3))).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.totals.inflow, Decimal::ZERO);
        assert_eq!(s.totals.outflow, Decimal::new(1500, 0));
        assert_eq!(s.totals.balance, Decimal::new(-1500, 0));
    }

    #[test]
    fn test_sum_and_bucket_laws() {
        let txns = sample();
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 31));
        let s = summarize(&txns, &range).unwrap();

        let filtered: Decimal = txns
            .iter()
            .filter(|t| range.contains(t.date))
            .map(|t| t.amount)
            .sum();
        assert_eq!(s.totals.inflow + s.totals.outflow, filtered);

        let daily_in: Decimal = s.daily.values().map(|f| f.inflow).sum();
        let daily_out: Decimal = s.daily.values().map(|f| f.outflow).sum();
        let monthly_in: Decimal = s.monthly.values().map(|f| f.inflow).sum();
        assert_eq!(daily_in, s.totals.inflow);
        assert_eq!(daily_out, s.totals.outflow);
        assert_eq!(monthly_in, s.totals.inflow);
    }

    #[test]
    fn test_order_independent_and_idempotent() {
        let txns = sample();
        let range = DateRange::spanning(&txns).unwrap();
        let mut reversed = txns.clone();
        reversed.reverse();
        assert_eq!(summarize(&txns, &range), summarize(&reversed, &range));
        assert_eq!(summarize(&txns, &range), summarize(&txns, &range));
    }

    #[test]
    fn test_empty_range() {
        let txns = sample();
        let s = summarize(&txns, &DateRange::new(ymd(2025, 1, 1), ymd(2025, 12, 31))).unwrap();
        assert_eq!(s, Summary::default());
        assert_eq!(DateRange::spanning(&[]), None);
    }

    #[test]
    fn test_resolve_open_bounds() {
        let txns = sample();
        let r = DateRange::resolve(Some(ymd(2024, 1, 10)), None, &txns).unwrap();
        assert_eq!(r, DateRange::new(ymd(2024, 1, 10), ymd(2024, 2, 1)));
        let r = DateRange::resolve(None, None, &txns).unwrap();
        assert_eq!(r, DateRange::new(ymd(2024, 1, 3), ymd(2024, 2, 1)));
        assert_eq!(DateRange::resolve(Some(ymd(2024, 1, 1)), None, &[]), None);
        assert!(DateRange::resolve(Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 2)), &[]).is_some());
    }

    #[test]
    fn test_sum_past_decimal_max_is_an_error() {
        let mut big = txn(ymd(2024, 1, 3), 0, Direction::Inflow, None);
        big.amount = Decimal::MAX;
        let mut second = big.clone();
        second.row = 1;
        let txns = vec![big, second];

        let range = DateRange::spanning(&txns).unwrap();
        assert_eq!(summarize(&txns, &range), Err(EngineError::Overflow { row: 1 }));

        // one of them alone is fine
        let s = summarize(&txns[..1], &range).unwrap();
        assert_eq!(s.totals.inflow, Decimal::MAX);
        assert_eq!(s.totals.balance, Decimal::MAX);
    }
}
