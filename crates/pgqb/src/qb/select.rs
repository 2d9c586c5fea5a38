//! SELECT statement builder.

use crate::clause::{Clause, normalize};
use crate::error::QbResult;
use crate::node::Arg;
use crate::qb::from::{FromList, Join, JoinKind};
use crate::qb::param::Sink;
use crate::qb::{Expr, SqlNode};
use crate::render::{Ctx, ident_list, render_ident};

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// SELECT statement builder.
///
/// Columns, sources and ORDER BY keys render in identifier position, so
/// `"person.name"` and `"created_at DESC"` work as shorthand. WHERE and HAVING
/// accept any [`Clause`] and repeated calls are AND-combined.
///
/// ```
/// use pgqb::prelude::*;
///
/// let q = select(["*"])
///     .from("person")
///     .where_(fields! { "name" => "John", "id" => gt(1) });
/// let p = q.to_params().unwrap();
/// assert_eq!(p.text, "SELECT * FROM person WHERE name = $1 AND id > $2");
/// assert_eq!(p.values, vec![Value::from("John"), Value::from(1)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Select {
    /// SELECT columns (empty renders `*`)
    columns: Vec<Arg>,
    /// `Some(vec![])` is plain DISTINCT, otherwise DISTINCT ON (...)
    distinct: Option<Vec<Arg>>,
    into: Option<Arg>,
    from: FromList,
    where_expr: Expr,
    group_by: Vec<Arg>,
    having_expr: Expr,
    order_by: Vec<(Arg, Option<Order>)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    /// Create an empty SELECT.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== SELECT columns ====================

    /// Add columns.
    pub fn columns<I, A>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a single column.
    pub fn column(mut self, column: impl Into<Arg>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// `SELECT DISTINCT`
    pub fn distinct(mut self) -> Self {
        self.distinct = Some(Vec::new());
        self
    }

    /// `SELECT DISTINCT ON (...)`
    pub fn distinct_on<I, A>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.distinct = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// `SELECT ... INTO table`
    pub fn into_table(mut self, table: impl Into<Arg>) -> Self {
        self.into = Some(table.into());
        self
    }

    // ==================== FROM & joins ====================

    /// Add a FROM source.
    pub fn from(mut self, source: impl Into<Arg>) -> Self {
        self.from.push_source(source);
        self
    }

    fn push_join(mut self, kind: JoinKind, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.from.push_join(Join::new(kind, table, on));
        self
    }

    /// `INNER JOIN table ON ...` after the last FROM source.
    pub fn join(self, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.push_join(JoinKind::Inner, table, on)
    }

    /// `LEFT JOIN table ON ...` after the last FROM source.
    pub fn left_join(self, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.push_join(JoinKind::Left, table, on)
    }

    /// `RIGHT JOIN table ON ...` after the last FROM source.
    pub fn right_join(self, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.push_join(JoinKind::Right, table, on)
    }

    /// `FULL JOIN table ON ...` after the last FROM source.
    pub fn full_join(self, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.push_join(JoinKind::Full, table, on)
    }

    /// `CROSS JOIN table` after the last FROM source.
    pub fn cross_join(self, table: impl Into<Arg>) -> Self {
        self.push_join(JoinKind::Cross, table, Clause::Empty)
    }

    // ==================== Conditions ====================

    /// AND a condition into WHERE.
    pub fn where_(mut self, clause: impl Into<Clause>) -> Self {
        let prev = std::mem::take(&mut self.where_expr);
        self.where_expr = Expr::and(vec![prev, normalize(clause.into(), false)]);
        self
    }

    /// AND a condition into HAVING.
    pub fn having(mut self, clause: impl Into<Clause>) -> Self {
        let prev = std::mem::take(&mut self.having_expr);
        self.having_expr = Expr::and(vec![prev, normalize(clause.into(), false)]);
        self
    }

    // ==================== Ordering & Grouping ====================

    /// Add GROUP BY columns.
    pub fn group_by<I, A>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add an ORDER BY key. A direction may be part of the text (`"id DESC"`).
    pub fn order_by(mut self, column: impl Into<Arg>) -> Self {
        self.order_by.push((column.into(), None));
        self
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(mut self, column: impl Into<Arg>) -> Self {
        self.order_by.push((column.into(), Some(Order::Asc)));
        self
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(mut self, column: impl Into<Arg>) -> Self {
        self.order_by.push((column.into(), Some(Order::Desc)));
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        let p = page.max(1);
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((p - 1).saturating_mul(size));
        self
    }
}

impl SqlNode for Select {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        self.from.check()?;

        let mut sql = String::from("SELECT ");
        if let Some(on) = &self.distinct {
            sql.push_str("DISTINCT ");
            if !on.is_empty() {
                sql.push_str(&format!("ON ({}) ", ident_list(on, &mut *sink, ctx)?));
            }
        }

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&ident_list(&self.columns, &mut *sink, ctx)?);
        }

        if let Some(into) = &self.into {
            sql.push_str(" INTO ");
            sql.push_str(&render_ident(into, &mut *sink, ctx)?);
        }

        if !self.from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.from.write_sql(&mut *sink, ctx)?);
        }

        let where_sql = self.where_expr.write_sql(&mut *sink, ctx)?;
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&ident_list(&self.group_by, &mut *sink, ctx)?);
        }

        let having_sql = self.having_expr.write_sql(&mut *sink, ctx)?;
        if !having_sql.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having_sql);
        }

        if !self.order_by.is_empty() {
            let mut keys = Vec::with_capacity(self.order_by.len());
            for (column, dir) in &self.order_by {
                let key = render_ident(column, &mut *sink, ctx)?;
                match dir {
                    Some(dir) => keys.push(format!("{key} {}", dir.as_sql())),
                    None => keys.push(key),
                }
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&keys.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok(sql)
    }
}
