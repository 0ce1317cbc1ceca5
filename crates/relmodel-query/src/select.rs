//! Single-record SELECT query builder.

use crate::clause::{Limit, OrderBy, Where};
use crate::expr::{Dialect, Expr};
use relmodel_core::{Record, Value};
use std::marker::PhantomData;

/// A SELECT query that resolves at most one record.
///
/// This is the query shape associations use to load their target: a
/// composed filter, optional projection and ordering, and an implicit
/// `LIMIT 1`. Even when more rows match, only the first is authoritative.
#[derive(Debug, Clone)]
pub struct SelectOne<M: Record> {
    /// Columns to select (empty = all)
    columns: Vec<String>,
    /// WHERE clause conditions
    where_clause: Option<Where>,
    /// ORDER BY clauses
    order_by: Vec<OrderBy>,
    /// Associations the backend may preload alongside the record
    include: Vec<String>,
    /// Whether the resulting record is read-only
    readonly: bool,
    /// Record type marker
    _marker: PhantomData<M>,
}

impl<M: Record> SelectOne<M> {
    /// Create a new single-record query for the record's table.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            where_clause: None,
            order_by: Vec::new(),
            include: Vec::new(),
            readonly: false,
            _marker: PhantomData,
        }
    }

    /// Select specific columns.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// Add a WHERE condition (AND-combined with any existing condition).
    pub fn filter(mut self, expr: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(expr),
            None => Where::new(expr),
        });
        self
    }

    /// Add an ORDER BY clause.
    pub fn order(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    /// Name associations the backend may preload.
    pub fn include(mut self, names: &[&str]) -> Self {
        self.include = names.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// Mark the resulting record read-only.
    pub fn readonly(mut self, value: bool) -> Self {
        self.readonly = value;
        self
    }

    /// The WHERE clause, if any.
    pub fn where_clause(&self) -> Option<&Where> {
        self.where_clause.as_ref()
    }

    /// The selected columns (empty = all).
    pub fn selected_columns(&self) -> &[String] {
        &self.columns
    }

    /// The ORDER BY clauses.
    pub fn order_clauses(&self) -> &[OrderBy] {
        &self.order_by
    }

    /// The include list.
    pub fn included(&self) -> &[String] {
        &self.include
    }

    /// Whether the record should be treated as read-only.
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Evaluate the query's filter against a row's `(column, value)` pairs.
    ///
    /// A query with no filter matches every row.
    pub fn matches(&self, row: &[(&str, Value)]) -> bool {
        self.where_clause.as_ref().is_none_or(|w| w.matches(row))
    }

    /// Render the full query to SQL and bound parameters.
    pub fn to_sql(&self, dialect: Dialect) -> (String, Vec<Value>) {
        let mut params = Vec::new();

        let projection = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|c| dialect.quote_identifier(c))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!(
            "SELECT {projection} FROM {}",
            dialect.quote_identifier(M::TABLE_NAME)
        );

        if let Some(where_clause) = &self.where_clause {
            let mut where_params = Vec::new();
            let rendered = where_clause.expr().to_sql(dialect, &mut where_params);
            sql.push_str(" WHERE ");
            sql.push_str(&rendered);
            params.extend(where_params);
        }

        if !self.order_by.is_empty() {
            let rendered = self
                .order_by
                .iter()
                .map(|o| o.to_sql(dialect))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&rendered);
        }

        sql.push(' ');
        sql.push_str(&Limit(1).to_sql());

        tracing::trace!(sql = %sql, params = params.len(), "built single-record query");
        (sql, params)
    }
}

impl<M: Record> Default for SelectOne<M> {
    fn default() -> Self {
        Self::new()
    }
}
