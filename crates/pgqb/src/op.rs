//! Comparison operations.
//!
//! An [`Operation`] is the right-hand half of a condition: `= $1`,
//! `BETWEEN $1 AND $2`, `IN ($1, $2)`. It becomes a condition once paired with
//! a column, either through a [`Fields`](crate::Fields) entry or a
//! `(column, operation)` clause.
//!
//! # Example
//! ```
//! use pgqb::prelude::*;
//!
//! let q = select(["*"]).from("person").where_(fields! {
//!     "age" => between(18, 65),
//!     "id" => in_list(vec![1, 2, 3]),
//!     "deleted_at" => eq(None::<i64>),
//! });
//! assert_eq!(
//!     q.to_params().unwrap().text,
//!     "SELECT * FROM person WHERE age BETWEEN $1 AND $2 AND id IN ($3, $4, $5) AND deleted_at IS NULL"
//! );
//! ```

use crate::error::QbResult;
use crate::node::Arg;
use crate::qb::SqlNode;
use crate::qb::param::Sink;
use crate::render::{Ctx, render_plain, render_value};

/// `ALL` / `ANY` quantifier for array and sub-query comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    All,
    Any,
}

impl Quantifier {
    fn as_sql(self) -> &'static str {
        match self {
            Quantifier::All => "ALL",
            Quantifier::Any => "ANY",
        }
    }
}

/// A comparison fragment awaiting its column.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `<op> value`, or `<op> ANY (value)` when quantified.
    Compare {
        op: &'static str,
        value: Box<Arg>,
        quantifier: Option<Quantifier>,
    },
    /// A fixed postfix such as `IS NULL`.
    Unary(&'static str),
    /// `LIKE pattern` or `ILIKE pattern`.
    Like { pattern: Box<Arg>, insensitive: bool },
    /// `BETWEEN low AND high`.
    Between { low: Box<Arg>, high: Box<Arg> },
    /// `IN (...)` or `NOT IN (...)`.
    In { values: Box<Arg>, negated: bool },
}

impl Operation {
    /// Whether this operation can be rendered.
    ///
    /// `IN`/`NOT IN` over an empty list is invalid and renders as nothing, so
    /// the enclosing AND/OR can drop it.
    pub fn is_valid(&self) -> bool {
        match self {
            Operation::In { values, .. } => !matches!(values.as_ref(), Arg::List(items) if items.is_empty()),
            _ => true,
        }
    }

    /// Compare against any element: `= ANY (...)`.
    pub fn any(self) -> Self {
        self.quantified(Quantifier::Any)
    }

    /// Compare against every element: `= ALL (...)`.
    pub fn all(self) -> Self {
        self.quantified(Quantifier::All)
    }

    fn quantified(self, q: Quantifier) -> Self {
        match self {
            Operation::Compare { op, value, .. } => Operation::Compare {
                op,
                value,
                quantifier: Some(q),
            },
            other => other,
        }
    }
}

impl SqlNode for Operation {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        if !self.is_valid() {
            return Ok(String::new());
        }
        match self {
            Operation::Compare {
                op,
                value,
                quantifier,
            } => {
                let rendered = render_value(value, sink, ctx, false)?;
                match quantifier {
                    // Statements already carry their parentheses.
                    Some(q) if value.is_statement() => Ok(format!("{op} {} {rendered}", q.as_sql())),
                    Some(q) => Ok(format!("{op} {} ({rendered})", q.as_sql())),
                    None => Ok(format!("{op} {rendered}")),
                }
            }
            Operation::Unary(op) => Ok((*op).to_string()),
            Operation::Like {
                pattern,
                insensitive,
            } => {
                let kw = if *insensitive { "ILIKE" } else { "LIKE" };
                Ok(format!("{kw} {}", render_value(pattern, sink, ctx, false)?))
            }
            Operation::Between { low, high } => {
                let low = render_value(low, &mut *sink, ctx, false)?;
                let high = render_value(high, &mut *sink, ctx, false)?;
                Ok(format!("BETWEEN {low} AND {high}"))
            }
            Operation::In { values, negated } => {
                let list = match values.as_ref() {
                    Arg::List(_) => render_value(values, sink, ctx, true)?,
                    Arg::Node(node) => format!("({})", render_plain(node, sink, ctx)?),
                    Arg::Value(value) => format!("({})", sink.bind(value)),
                };
                let kw = if *negated { "NOT IN" } else { "IN" };
                Ok(format!("{kw} {list}"))
            }
        }
    }
}

fn compare(op: &'static str, value: impl Into<Arg>) -> Operation {
    Operation::Compare {
        op,
        value: Box::new(value.into()),
        quantifier: None,
    }
}

/// `= value`, or `IS NULL` when the value is null.
pub fn eq(value: impl Into<Arg>) -> Operation {
    let value = value.into();
    if value.is_null() {
        return Operation::Unary("IS NULL");
    }
    compare("=", value)
}

/// `<> value`, or `IS NOT NULL` when the value is null.
pub fn ne(value: impl Into<Arg>) -> Operation {
    let value = value.into();
    if value.is_null() {
        return Operation::Unary("IS NOT NULL");
    }
    compare("<>", value)
}

/// `< value`
pub fn lt(value: impl Into<Arg>) -> Operation {
    compare("<", value)
}

/// `<= value`
pub fn le(value: impl Into<Arg>) -> Operation {
    compare("<=", value)
}

/// `> value`
pub fn gt(value: impl Into<Arg>) -> Operation {
    compare(">", value)
}

/// `>= value`
pub fn ge(value: impl Into<Arg>) -> Operation {
    compare(">=", value)
}

/// `LIKE pattern`. Use [`escape_pattern`](crate::quote::escape_pattern) for
/// user-supplied fragments.
pub fn like(pattern: impl Into<Arg>) -> Operation {
    Operation::Like {
        pattern: Box::new(pattern.into()),
        insensitive: false,
    }
}

/// `ILIKE pattern`
pub fn ilike(pattern: impl Into<Arg>) -> Operation {
    Operation::Like {
        pattern: Box::new(pattern.into()),
        insensitive: true,
    }
}

/// `BETWEEN low AND high`
pub fn between(low: impl Into<Arg>, high: impl Into<Arg>) -> Operation {
    Operation::Between {
        low: Box::new(low.into()),
        high: Box::new(high.into()),
    }
}

/// `IN (...)` over a list, a sub-query or a single value.
pub fn in_list(values: impl Into<Arg>) -> Operation {
    Operation::In {
        values: Box::new(values.into()),
        negated: false,
    }
}

/// `NOT IN (...)` over a list, a sub-query or a single value.
pub fn not_in(values: impl Into<Arg>) -> Operation {
    Operation::In {
        values: Box::new(values.into()),
        negated: true,
    }
}
