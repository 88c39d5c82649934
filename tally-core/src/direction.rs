//! Inflow/outflow resolution.
//!
//! Two strategies, picked by whether the table has a type column:
//! [`SignDirection`] reads the amount's sign, [`TypeLabelDirection`] reads the label and
//! only falls back to the sign for labels it does not know.

use crate::config::{DirectionConfig, fold};
use crate::model::Direction;
use rust_decimal::Decimal;

pub trait DirectionStrategy {
    fn resolve(&self, signed_amount: Decimal, type_label: Option<&str>) -> Direction;
}

/// Negative amounts are outflows, everything else is an inflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignDirection;

impl DirectionStrategy for SignDirection {
    fn resolve(&self, signed_amount: Decimal, _type_label: Option<&str>) -> Direction {
        if signed_amount.is_sign_negative() && !signed_amount.is_zero() {
            Direction::Outflow
        } else {
            Direction::Inflow
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeLabelDirection {
    inflow: Vec<String>,
    outflow: Vec<String>,
}

impl TypeLabelDirection {
    pub fn new(cfg: &DirectionConfig) -> Self {
        Self {
            inflow: cfg.inflow_labels.iter().map(|l| fold(l)).collect(),
            outflow: cfg.outflow_labels.iter().map(|l| fold(l)).collect(),
        }
    }

    /// Direction named by the label alone, if it is a known one.
    pub fn label_direction(&self, label: &str) -> Option<Direction> {
        let label = fold(label.trim());
        if self.inflow.contains(&label) {
            Some(Direction::Inflow)
        } else if self.outflow.contains(&label) {
            Some(Direction::Outflow)
        } else {
            None
        }
    }
}

impl DirectionStrategy for TypeLabelDirection {
    fn resolve(&self, signed_amount: Decimal, type_label: Option<&str>) -> Direction {
        match type_label.and_then(|l| self.label_direction(l)) {
            Some(direction) => direction,
            None => SignDirection.resolve(signed_amount, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_direction() {
        assert_eq!(SignDirection.resolve(Decimal::new(-1500, 0), None), Direction::Outflow);
        assert_eq!(SignDirection.resolve(Decimal::new(2000, 0), None), Direction::Inflow);
        assert_eq!(SignDirection.resolve(Decimal::ZERO, None), Direction::Inflow);
        // a label is ignored by the sign strategy
        assert_eq!(
            SignDirection.resolve(Decimal::new(5, 0), Some("egreso")),
            Direction::Inflow
        );
    }

    #[test]
    fn test_label_wins_over_sign() {
        let s = TypeLabelDirection::new(&DirectionConfig::default());
        assert_eq!(s.resolve(Decimal::new(300, 0), Some("Egreso")), Direction::Outflow);
        assert_eq!(s.resolve(Decimal::new(-300, 0), Some(" ABONO ")), Direction::Inflow);
        assert_eq!(s.resolve(Decimal::new(-300, 0), Some("Débito")), Direction::Outflow);
    }

    #[test]
    fn test_unknown_label_falls_back_to_sign() {
        let s = TypeLabelDirection::new(&DirectionConfig::default());
        assert_eq!(s.resolve(Decimal::new(-10, 0), Some("SPEI")), Direction::Outflow);
        assert_eq!(s.resolve(Decimal::new(10, 0), None), Direction::Inflow);
    }
}
