//! Period keys derived from a transaction date.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Half {
    /// Days 1–15.
    First,
    /// Day 16 to the end of the month.
    Second,
}

impl Half {
    pub fn number(&self) -> u8 {
        match self {
            Half::First => 1,
            Half::Second => 2,
        }
    }
}

/// Calendar month. Serializes as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

/// Half of a calendar month. Serializes as `YYYY-MM-H1` / `YYYY-MM-H2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct FortnightKey {
    pub year: i32,
    pub month: u32,
    pub half: Half,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl FortnightKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            half: if date.day() <= 15 {
                Half::First
            } else {
                Half::Second
            },
        }
    }

    pub fn new(year: i32, month: u32, half: Half) -> Self {
        Self { year, month, half }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for FortnightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-H{}", self.year, self.month, self.half.number())
    }
}

impl From<MonthKey> for String {
    fn from(k: MonthKey) -> Self {
        k.to_string()
    }
}

impl From<FortnightKey> for String {
    fn from(k: FortnightKey) -> Self {
        k.to_string()
    }
}
