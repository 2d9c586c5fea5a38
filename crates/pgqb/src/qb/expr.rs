//! Boolean expression layer for WHERE/HAVING/ON conditions.
//!
//! [`Expr`] is the canonical form every clause shorthand is normalized into
//! (see [`crate::clause`]). Groups are flattened on construction, so
//! `AND(AND(a, b), c)` is stored, and rendered, as `AND(a, b, c)`.
//!
//! An expression that renders to an empty string means "no condition"; the
//! statement builders omit the `WHERE`/`HAVING`/`ON` keyword in that case.

use crate::error::QbResult;
use crate::node::{Arg, Node};
use crate::op::Operation;
use crate::qb::SqlNode;
use crate::qb::param::Sink;
use crate::render::{Ctx, render_ident, render_plain};

/// Expression node for building WHERE/HAVING clauses.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// AND group: all conditions must be true.
    And(Vec<Expr>),

    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),

    /// NOT: negate the inner expression.
    Not(Box<Expr>),

    /// EXISTS (subquery)
    Exists(Box<Node>),

    /// Column paired with a comparison: `column <op>`.
    Op { column: Box<Arg>, op: Operation },

    /// Any other node, rendered verbatim.
    Raw(Box<Node>),
}

impl Default for Expr {
    fn default() -> Self {
        Expr::And(Vec::new())
    }
}

impl Expr {
    /// Create an AND expression, absorbing nested ANDs and trivial groups.
    pub fn and(exprs: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                Expr::And(children) => flat.extend(children),
                Expr::Or(children) if children.len() <= 1 => flat.extend(children),
                other => flat.push(other),
            }
        }
        Expr::And(flat)
    }

    /// Create an OR expression, absorbing nested ORs and trivial groups.
    pub fn or(exprs: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                Expr::Or(children) => flat.extend(children),
                Expr::And(children) if children.len() <= 1 => flat.extend(children),
                other => flat.push(other),
            }
        }
        Expr::Or(flat)
    }

    /// Create a NOT expression. `NOT NOT x` collapses to `x`.
    pub fn not(expr: Expr) -> Self {
        match expr {
            Expr::Not(inner) => *inner,
            other => Expr::Not(Box::new(other)),
        }
    }

    /// Create an EXISTS expression.
    pub fn exists(subquery: impl Into<Node>) -> Self {
        Expr::Exists(Box::new(subquery.into()))
    }

    /// Pair a column with an operation.
    pub fn op(column: impl Into<Arg>, op: Operation) -> Self {
        Expr::Op {
            column: Box::new(column.into()),
            op,
        }
    }

    /// Check if this expression contains no conditions at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().all(|e| e.is_empty()),
            Expr::Not(inner) => inner.is_empty(),
            Expr::Op { op, .. } => !op.is_valid(),
            _ => false,
        }
    }

    fn is_group(&self) -> bool {
        matches!(self, Expr::And(_) | Expr::Or(_))
    }
}

fn write_group(exprs: &[Expr], sep: &str, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
    let mut parts = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let sql = expr.write_sql(&mut *sink, ctx)?;
        if sql.is_empty() {
            continue;
        }
        // Wrap nested groups to keep AND/OR precedence.
        if expr.is_group() {
            parts.push(format!("({sql})"));
        } else {
            parts.push(sql);
        }
    }
    Ok(parts.join(sep))
}

impl SqlNode for Expr {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        match self {
            Expr::And(exprs) => write_group(exprs, " AND ", sink, ctx),
            Expr::Or(exprs) => write_group(exprs, " OR ", sink, ctx),
            Expr::Not(inner) => {
                let sql = inner.write_sql(sink, ctx)?;
                if sql.is_empty() {
                    Ok(String::new())
                } else {
                    Ok(format!("NOT ({sql})"))
                }
            }
            Expr::Exists(subquery) => Ok(format!("EXISTS ({})", render_plain(subquery, sink, ctx)?)),
            Expr::Op { column, op } => {
                if !op.is_valid() {
                    return Ok(String::new());
                }
                let column = render_ident(column, &mut *sink, ctx)?;
                let op = op.write_sql(sink, ctx)?;
                Ok(format!("{column} {op}"))
            }
            Expr::Raw(node) => node.write_sql(sink, ctx),
        }
    }
}
