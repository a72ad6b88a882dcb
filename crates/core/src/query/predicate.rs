//! Typed predicate tree compiled to `sea_query` conditions.

use std::collections::BTreeSet;
use std::ops::Not;

use sea_orm::sea_query::{Alias, Condition, Expr, SimpleExpr};

/// A set of item IDs.
pub type IdSet = BTreeSet<i64>;

/// A column qualified by the table or join alias it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnPath {
    pub table: &'static str,
    pub column: &'static str,
}

impl ColumnPath {
    #[must_use]
    pub const fn new(table: &'static str, column: &'static str) -> Self {
        Self { table, column }
    }

    fn expr(self) -> Expr {
        Expr::col((Alias::new(self.table), Alias::new(self.column)))
    }

    /// The qualified column as a `sea_query` expression.
    #[must_use]
    pub fn to_simple_expr(self) -> SimpleExpr {
        self.expr().into()
    }
}

/// A literal compared against a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&Literal> for SimpleExpr {
    fn from(value: &Literal) -> Self {
        match value {
            Literal::Int(v) => (*v).into(),
            Literal::Text(v) => v.clone().into(),
            Literal::Bool(v) => (*v).into(),
        }
    }
}

/// A boolean filter over listing columns.
///
/// Constructors that take ID sets return `None` for an empty set, and
/// [`Predicate::all`] / [`Predicate::any`] return `None` when given nothing,
/// so a tree never contains an always-true or always-false filler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(ColumnPath, Literal),
    Ne(ColumnPath, Literal),
    In(ColumnPath, IdSet),
    NotIn(ColumnPath, IdSet),
    IsNull(ColumnPath),
    ColumnEq(ColumnPath, ColumnPath),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(column: ColumnPath, value: impl Into<Literal>) -> Self {
        Self::Eq(column, value.into())
    }

    pub fn ne(column: ColumnPath, value: impl Into<Literal>) -> Self {
        Self::Ne(column, value.into())
    }

    #[must_use]
    pub const fn is_null(column: ColumnPath) -> Self {
        Self::IsNull(column)
    }

    #[must_use]
    pub const fn column_eq(left: ColumnPath, right: ColumnPath) -> Self {
        Self::ColumnEq(left, right)
    }

    /// `column IN (ids)`, or `None` when `ids` is empty.
    pub fn in_ids(column: ColumnPath, ids: impl IntoIterator<Item = i64>) -> Option<Self> {
        let ids: IdSet = ids.into_iter().collect();
        (!ids.is_empty()).then_some(Self::In(column, ids))
    }

    /// `column NOT IN (ids)`, or `None` when `ids` is empty.
    pub fn not_in(column: ColumnPath, ids: impl IntoIterator<Item = i64>) -> Option<Self> {
        let ids: IdSet = ids.into_iter().collect();
        (!ids.is_empty()).then_some(Self::NotIn(column, ids))
    }

    /// Conjunction of `items`; a single item is returned as is.
    pub fn all(items: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut items: Vec<Self> = items.into_iter().collect();
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(Self::And(items)),
        }
    }

    /// Disjunction of `items`; a single item is returned as is.
    pub fn any(items: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut items: Vec<Self> = items.into_iter().collect();
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(Self::Or(items)),
        }
    }

    /// Compile into a `sea_query` condition.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        match self {
            Self::Eq(column, value) => leaf(column.expr().eq(SimpleExpr::from(value))),
            Self::Ne(column, value) => leaf(column.expr().ne(SimpleExpr::from(value))),
            Self::In(column, ids) => leaf(column.expr().is_in(ids.iter().copied())),
            Self::NotIn(column, ids) => leaf(column.expr().is_not_in(ids.iter().copied())),
            Self::IsNull(column) => leaf(column.expr().is_null()),
            Self::ColumnEq(left, right) => leaf(
                left.expr()
                    .equals((Alias::new(right.table), Alias::new(right.column))),
            ),
            Self::And(items) => items
                .iter()
                .fold(Condition::all(), |cond, item| cond.add(item.to_condition())),
            Self::Or(items) => items
                .iter()
                .fold(Condition::any(), |cond, item| cond.add(item.to_condition())),
            Self::Not(inner) => inner.to_condition().not(),
        }
    }
}

fn leaf(expr: SimpleExpr) -> Condition {
    Condition::all().add(expr)
}

impl Not for Predicate {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{PostgresQueryBuilder, Query};

    const USER_ID: ColumnPath = ColumnPath::new("activity", "user_id");
    const COMPONENT: ColumnPath = ColumnPath::new("activity", "component");

    fn render(predicate: &Predicate) -> String {
        Query::select()
            .column(Alias::new("id"))
            .from(Alias::new("activity"))
            .cond_where(predicate.to_condition())
            .to_string(PostgresQueryBuilder)
    }

    #[test]
    fn test_empty_sets_produce_no_predicate() {
        assert!(Predicate::not_in(USER_ID, Vec::new()).is_none());
        assert!(Predicate::in_ids(USER_ID, IdSet::new()).is_none());
        assert!(Predicate::all(Vec::new()).is_none());
        assert!(Predicate::any(Vec::new()).is_none());
    }

    #[test]
    fn test_single_item_is_not_wrapped() {
        let leaf = Predicate::not_in(USER_ID, [3, 1]).unwrap();
        assert_eq!(Predicate::all([leaf.clone()]), Some(leaf));
    }

    #[test]
    fn test_not_in_renders_sorted_ids() {
        let sql = render(&Predicate::not_in(USER_ID, [5, 2, 5]).unwrap());
        assert!(sql.contains(r#""activity"."user_id" NOT IN (2, 5)"#), "{sql}");
    }

    #[test]
    fn test_or_of_component_and_ids() {
        let predicate = Predicate::any([
            Predicate::ne(COMPONENT, "groups"),
            Predicate::not_in(ColumnPath::new("activity", "item_id"), [42]).unwrap(),
        ])
        .unwrap();

        let sql = render(&predicate);
        assert!(sql.contains(r#""activity"."component" <> 'groups'"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains(r#""activity"."item_id" NOT IN (42)"#), "{sql}");
    }

    #[test]
    fn test_double_negation_cancels() {
        let leaf = Predicate::is_null(ColumnPath::new("mo", "id"));
        assert_eq!(!!leaf.clone(), leaf);
    }

    #[test]
    fn test_column_eq_renders_both_sides() {
        let sql = render(&Predicate::column_eq(
            ColumnPath::new("mo", "item_id"),
            ColumnPath::new("activity", "id"),
        ));
        assert!(sql.contains(r#""mo"."item_id" = "activity"."id""#), "{sql}");
    }
}
