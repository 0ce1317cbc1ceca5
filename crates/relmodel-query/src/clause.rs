//! SQL clause types (WHERE, ORDER BY, LIMIT).

use crate::expr::{Dialect, Expr, compare_values};
use relmodel_core::Value;
use std::cmp::Ordering;

/// WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    expr: Expr,
}

impl Where {
    /// Create a new WHERE clause with the given expression.
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    /// Add an AND condition.
    pub fn and(self, expr: Expr) -> Self {
        Self {
            expr: self.expr.and(expr),
        }
    }

    /// Add an OR condition.
    pub fn or(self, expr: Expr) -> Self {
        Self {
            expr: self.expr.or(expr),
        }
    }

    /// The underlying predicate expression.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Build the WHERE clause SQL and parameters.
    pub fn build(&self, dialect: Dialect) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let sql = self.expr.to_sql(dialect, &mut params);
        (sql, params)
    }

    /// Evaluate the clause against a row's `(column, value)` pairs.
    pub fn matches(&self, row: &[(&str, Value)]) -> bool {
        self.expr.matches(row)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    column: String,
    direction: OrderDirection,
}

impl OrderBy {
    /// Create an ascending order by clause.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Create a descending order by clause.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Desc,
        }
    }

    /// The ordered column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The sort direction.
    pub fn direction(&self) -> OrderDirection {
        self.direction
    }

    /// Generate SQL for this ORDER BY clause.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let dir = match self.direction {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        };
        format!("{} {dir}", dialect.quote_identifier(&self.column))
    }

    /// Compare two rows under this ordering. NULLs sort first.
    pub fn compare(&self, a: &[(&str, Value)], b: &[(&str, Value)]) -> Ordering {
        let lookup = |row: &[(&str, Value)]| {
            row.iter()
                .find(|(column, _)| *column == self.column)
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Null)
        };
        let (va, vb) = (lookup(a), lookup(b));
        let ordering = match (va.is_null(), vb.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => compare_values(&va, &vb).unwrap_or(Ordering::Equal),
        };
        match self.direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    }
}

/// LIMIT clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(pub u64);

impl Limit {
    /// Generate SQL for this LIMIT clause.
    pub fn to_sql(&self) -> String {
        format!("LIMIT {}", self.0)
    }
}
