//! DELETE statement builder.

use crate::clause::{Clause, normalize};
use crate::error::QbResult;
use crate::node::Arg;
use crate::qb::param::Sink;
use crate::qb::{Expr, SqlNode};
use crate::render::{Ctx, ident_list, render_ident};

/// DELETE statement builder.
///
/// A DELETE without conditions removes every row; no WHERE is added for you.
#[derive(Clone, Debug, PartialEq)]
pub struct Delete {
    table: Arg,
    using: Vec<Arg>,
    where_expr: Expr,
    returning: Vec<Arg>,
}

impl Delete {
    /// Create a new DELETE builder.
    pub fn new(table: impl Into<Arg>) -> Self {
        Self {
            table: table.into(),
            using: Vec::new(),
            where_expr: Expr::default(),
            returning: Vec::new(),
        }
    }

    /// Add a USING source.
    pub fn using(mut self, source: impl Into<Arg>) -> Self {
        self.using.push(source.into());
        self
    }

    /// AND a condition into WHERE.
    pub fn where_(mut self, clause: impl Into<Clause>) -> Self {
        let prev = std::mem::take(&mut self.where_expr);
        self.where_expr = Expr::and(vec![prev, normalize(clause.into(), false)]);
        self
    }

    /// Add RETURNING columns.
    pub fn returning<I, A>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.returning.extend(columns.into_iter().map(Into::into));
        self
    }
}

impl SqlNode for Delete {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        let mut sql = format!("DELETE FROM {}", render_ident(&self.table, &mut *sink, ctx)?);

        if !self.using.is_empty() {
            sql.push_str(" USING ");
            sql.push_str(&ident_list(&self.using, &mut *sink, ctx)?);
        }

        let where_sql = self.where_expr.write_sql(&mut *sink, ctx)?;
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&ident_list(&self.returning, sink, ctx)?);
        }

        Ok(sql)
    }
}
