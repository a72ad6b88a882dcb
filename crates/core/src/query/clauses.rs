//! Join and where fragments collected while a listing query is assembled.

use sea_orm::sea_query::{Alias, JoinType, SelectStatement};

use super::Predicate;

/// A `LEFT JOIN <table> AS <alias> ON <on>` fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinFragment {
    pub table: String,
    pub alias: String,
    pub on: Predicate,
}

impl JoinFragment {
    pub fn left(table: impl Into<String>, alias: impl Into<String>, on: Predicate) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            on,
        }
    }

    /// Append this join to a select statement.
    pub fn apply(&self, statement: &mut SelectStatement) {
        statement.join_as(
            JoinType::LeftJoin,
            Alias::new(self.table.as_str()),
            Alias::new(self.alias.as_str()),
            self.on.to_condition(),
        );
    }
}

/// Joins appended to a listing query, in order.
pub type JoinClauses = Vec<JoinFragment>;

/// Named where sub-clauses, kept in insertion order.
///
/// Inserting under an existing name replaces that clause in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereConditions {
    entries: Vec<(String, Predicate)>,
}

impl WhereConditions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, predicate: Predicate) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = predicate;
        } else {
            self.entries.push((name, predicate));
        }
    }

    /// Insert `predicate` if there is one.
    pub fn insert_some(&mut self, name: impl Into<String>, predicate: Option<Predicate>) {
        if let Some(predicate) = predicate {
            self.insert(name, predicate);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, predicate)| predicate)
    }

    pub fn remove(&mut self, name: &str) -> Option<Predicate> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// AND of every clause, or `None` when there are none.
    #[must_use]
    pub fn into_predicate(self) -> Option<Predicate> {
        Predicate::all(self.entries.into_iter().map(|(_, predicate)| predicate))
    }
}
