//! Semantic column roles and the per-table role assignment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Date,
    Amount,
    Type,
    Description,
    CounterpartyRef,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Date,
        Role::Amount,
        Role::Type,
        Role::Description,
        Role::CounterpartyRef,
    ];

    /// Roles the pipeline cannot run without.
    pub const MANDATORY: [Role; 2] = [Role::Date, Role::Amount];

    /// Keyword roles, in the order a column is offered to them.
    pub const KEYWORD: [Role; 3] = [Role::Type, Role::Description, Role::CounterpartyRef];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Date => "date",
            Role::Amount => "amount",
            Role::Type => "type",
            Role::Description => "description",
            Role::CounterpartyRef => "counterparty_ref",
        }
    }

    pub fn is_mandatory(&self) -> bool {
        Self::MANDATORY.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role → column name. At most one column per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMap {
    columns: BTreeMap<Role, String>,
}

impl RoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        self.columns.get(&role).map(String::as_str)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.columns.contains_key(&role)
    }

    /// Role already holding `column`, if any.
    pub fn role_of(&self, column: &str) -> Option<Role> {
        self.columns
            .iter()
            .find(|(_, c)| c.as_str() == column)
            .map(|(r, _)| *r)
    }

    /// Mandatory roles with no column.
    pub fn unresolved(&self) -> Vec<Role> {
        Role::MANDATORY
            .into_iter()
            .filter(|r| !self.contains(*r))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> + '_ {
        self.columns.iter().map(|(r, c)| (*r, c.as_str()))
    }

    /// Give `role` to `column`. A column holds at most one role, so any role it held
    /// before is released.
    pub fn assign(&mut self, role: Role, column: impl Into<String>) {
        let column = column.into();
        self.columns.retain(|r, c| *r == role || *c != column);
        self.columns.insert(role, column);
    }

    pub fn with(mut self, role: Role, column: impl Into<String>) -> Self {
        self.assign(role, column);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_lists_missing_mandatory_roles() {
        let map = RoleMap::new().with(Role::Description, "Detalle");
        assert_eq!(map.unresolved(), vec![Role::Date, Role::Amount]);

        let map = map.with(Role::Date, "Fecha");
        assert_eq!(map.unresolved(), vec![Role::Amount]);
        assert_eq!(map.role_of("Fecha"), Some(Role::Date));
    }

    #[test]
    fn test_assign_moves_column_between_roles() {
        let mut map = RoleMap::new()
            .with(Role::Description, "Detalle")
            .with(Role::Amount, "Saldo");
        map.assign(Role::Amount, "Detalle");
        assert_eq!(map.get(Role::Amount), Some("Detalle"));
        assert_eq!(map.get(Role::Description), None);
        assert_eq!(map.role_of("Saldo"), None);
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&Role::CounterpartyRef).unwrap();
        assert_eq!(json, "\"counterparty_ref\"");
    }
}
