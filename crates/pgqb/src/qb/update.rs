//! UPDATE statement builder.

use crate::clause::{Clause, Fields, normalize};
use crate::error::{QbError, QbResult};
use crate::node::Arg;
use crate::qb::param::Sink;
use crate::qb::{Expr, SqlNode, assignments};
use crate::render::{Ctx, ident_list, render_ident};

/// UPDATE statement builder.
///
/// Assignments keep the first value set for a column.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    table: Arg,
    values: Fields,
    from: Vec<Arg>,
    where_expr: Expr,
    returning: Vec<Arg>,
}

impl Update {
    /// Create a new UPDATE builder.
    pub fn new(table: impl Into<Arg>) -> Self {
        Self {
            table: table.into(),
            values: Fields::new(),
            from: Vec::new(),
            where_expr: Expr::default(),
            returning: Vec::new(),
        }
    }

    /// `SET column = value`, unless the column is already set.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        let column = column.into();
        if !self.values.contains(&column) {
            self.values.set(column, value);
        }
        self
    }

    /// Set several columns at once.
    pub fn set_fields(mut self, values: Fields) -> Self {
        for (column, value) in values.iter() {
            if !self.values.contains(column) {
                self.values.set(column, value.clone());
            }
        }
        self
    }

    /// Add a FROM source.
    pub fn from(mut self, source: impl Into<Arg>) -> Self {
        self.from.push(source.into());
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

impl SqlNode for Update {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        if self.values.is_empty() {
            return Err(QbError::malformed("update statement has no assignments"));
        }

        let table = render_ident(&self.table, &mut *sink, ctx)?;
        let mut sql = format!("UPDATE {table} SET {}", assignments(&self.values, &mut *sink, ctx)?);

        if !self.from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&ident_list(&self.from, &mut *sink, ctx)?);
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
