//! SQL expressions for query building.
//!
//! A type-safe expression system for building WHERE predicates. Expressions
//! render to parameterized SQL for real backends and evaluate directly
//! against a row's `(column, value)` pairs for in-process stores.

use relmodel_core::Value;
use std::cmp::Ordering;

/// SQL dialect for generating dialect-specific SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// PostgreSQL dialect (uses $1, $2 placeholders)
    #[default]
    Postgres,
    /// SQLite dialect (uses ?1, ?2 placeholders)
    Sqlite,
    /// MySQL dialect (uses ? placeholders)
    Mysql,
}

impl Dialect {
    /// Generate a placeholder for the given parameter index (1-based).
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => format!("?{index}"),
            Dialect::Mysql => "?".to_string(),
        }
    }

    /// Quote an identifier for this dialect.
    ///
    /// Embedded quote characters are escaped by doubling them.
    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => {
                let escaped = name.replace('"', "\"\"");
                format!("\"{}\"", escaped)
            }
            Dialect::Mysql => {
                let escaped = name.replace('`', "``");
                format!("`{}`", escaped)
            }
        }
    }
}

/// Binary operators usable in predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    const fn as_sql(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// A SQL predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference with optional table qualifier
    Column {
        /// Optional table name or alias
        table: Option<String>,
        /// Column name
        name: String,
    },

    /// Literal value (rendered as a bound parameter)
    Literal(Value),

    /// Binary operation (comparison or AND/OR combination)
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Parenthesized expression
    Paren(Box<Expr>),
}

impl Expr {
    /// Create a column reference.
    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column {
            table: None,
            name: name.into(),
        }
    }

    /// Create a table-qualified column reference.
    pub fn tcol(table: impl Into<String>, name: impl Into<String>) -> Self {
        Expr::Column {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// Create a literal value.
    pub fn val(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    fn binary(self, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// `self = value`
    pub fn eq(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Eq, Expr::val(value))
    }

    /// `self <> value`
    pub fn ne(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Ne, Expr::val(value))
    }

    /// `self < value`
    pub fn lt(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Lt, Expr::val(value))
    }

    /// `self <= value`
    pub fn le(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Le, Expr::val(value))
    }

    /// `self > value`
    pub fn gt(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Gt, Expr::val(value))
    }

    /// `self >= value`
    pub fn ge(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Ge, Expr::val(value))
    }

    /// `self AND other`
    pub fn and(self, other: Expr) -> Self {
        self.binary(BinaryOp::And, other)
    }

    /// `self OR other`
    pub fn or(self, other: Expr) -> Self {
        self.binary(BinaryOp::Or, other)
    }

    /// `self IS NULL`
    pub fn is_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    /// `self IS NOT NULL`
    pub fn is_not_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    /// Wrap in parentheses.
    pub fn paren(self) -> Self {
        Expr::Paren(Box::new(self))
    }

    /// Render this expression to SQL, pushing bound parameters onto `params`.
    pub fn to_sql(&self, dialect: Dialect, params: &mut Vec<Value>) -> String {
        match self {
            Expr::Column { table, name } => match table {
                Some(t) => format!(
                    "{}.{}",
                    dialect.quote_identifier(t),
                    dialect.quote_identifier(name)
                ),
                None => dialect.quote_identifier(name),
            },
            Expr::Literal(value) => {
                params.push(value.clone());
                dialect.placeholder(params.len())
            }
            Expr::Binary { left, op, right } => {
                let lhs = left.to_sql(dialect, params);
                let rhs = right.to_sql(dialect, params);
                format!("{lhs} {} {rhs}", op.as_sql())
            }
            Expr::IsNull { expr, negated } => {
                let inner = expr.to_sql(dialect, params);
                if *negated {
                    format!("{inner} IS NOT NULL")
                } else {
                    format!("{inner} IS NULL")
                }
            }
            Expr::Paren(inner) => format!("({})", inner.to_sql(dialect, params)),
        }
    }

    /// Evaluate this predicate against a row's `(column, value)` pairs.
    ///
    /// Comparison with NULL is false (SQL three-valued logic collapsed to
    /// the row-matching outcome). Table qualifiers are ignored; in-process
    /// stores hold one table per row set.
    pub fn matches(&self, row: &[(&str, Value)]) -> bool {
        match self {
            Expr::Binary { left, op, right } => match op {
                BinaryOp::And => left.matches(row) && right.matches(row),
                BinaryOp::Or => left.matches(row) || right.matches(row),
                _ => {
                    let lhs = left.resolve(row);
                    let rhs = right.resolve(row);
                    let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
                        return false;
                    };
                    if lhs.is_null() || rhs.is_null() {
                        return false;
                    }
                    match compare_values(&lhs, &rhs) {
                        Some(ordering) => match op {
                            BinaryOp::Eq => ordering == Ordering::Equal,
                            BinaryOp::Ne => ordering != Ordering::Equal,
                            BinaryOp::Lt => ordering == Ordering::Less,
                            BinaryOp::Le => ordering != Ordering::Greater,
                            BinaryOp::Gt => ordering == Ordering::Greater,
                            BinaryOp::Ge => ordering != Ordering::Less,
                            BinaryOp::And | BinaryOp::Or => unreachable!(),
                        },
                        None => false,
                    }
                }
            },
            Expr::IsNull { expr, negated } => {
                let value = expr.resolve(row);
                let null = value.is_none_or(|v| v.is_null());
                null != *negated
            }
            Expr::Paren(inner) => inner.matches(row),
            // A bare column or literal is not a predicate
            Expr::Column { .. } | Expr::Literal(_) => false,
        }
    }

    /// Resolve this expression to a value against a row, if it is a value
    /// expression (column reference or literal).
    fn resolve(&self, row: &[(&str, Value)]) -> Option<Value> {
        match self {
            Expr::Column { name, .. } => row
                .iter()
                .find(|(column, _)| *column == name.as_str())
                .map(|(_, value)| value.clone()),
            Expr::Literal(value) => Some(value.clone()),
            Expr::Paren(inner) => inner.resolve(row),
            _ => None,
        }
    }
}

/// Compare two values the way a store's comparison operators would.
///
/// Numeric values compare across integer/double representations; text,
/// bool, bytes, and timestamps compare within their own kind. Returns
/// `None` for NULL operands or incomparable kinds.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::Bytes(x), Value::Bytes(y)) => Some(x.cmp(y)),
        (Value::Timestamp(x), Value::Timestamp(y)) => Some(x.cmp(y)),
        _ => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                return Some(x.cmp(&y));
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            }
        }
    }
}
