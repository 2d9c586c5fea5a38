//! FROM lists and joins.

use crate::clause::{Clause, normalize};
use crate::error::{QbError, QbResult};
use crate::node::Arg;
use crate::qb::{Expr, SqlNode};
use crate::qb::param::Sink;
use crate::render::{Ctx, render_ident};

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// `<kind> <table> [ON <condition>]`
///
/// The ON condition renders with identifier preference, so a text value in a
/// [`Fields`](crate::Fields) shorthand names a column:
///
/// ```
/// use pgqb::prelude::*;
///
/// let q = select(["*"]).from("person").join("company", fields! { "company_id" => "company.id" });
/// assert_eq!(q.to_text().unwrap(), "SELECT * FROM person INNER JOIN company ON company_id = company.id");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    kind: JoinKind,
    table: Box<Arg>,
    on: Option<Expr>,
}

impl Join {
    /// Create a join. A clause with no conditions leaves out the ON part.
    pub fn new(kind: JoinKind, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        let on: Clause = on.into();
        let on = match on {
            Clause::Empty => None,
            clause => Some(normalize(clause, false)).filter(|expr| !expr.is_empty()),
        };
        Self {
            kind,
            table: Box::new(table.into()),
            on,
        }
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }
}

impl SqlNode for Join {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        let table = render_ident(&self.table, &mut *sink, ctx)?;
        let mut sql = format!("{} {table}", self.kind.as_sql());
        if let Some(on) = &self.on {
            let cond = on.write_sql(sink, Ctx::join_condition())?;
            if !cond.is_empty() {
                sql.push_str(" ON ");
                sql.push_str(&cond);
            }
        }
        Ok(sql)
    }
}

/// Comma-separated FROM sources, each followed by its joins.
///
/// Usable on its own as a source of another statement:
///
/// ```
/// use pgqb::prelude::*;
///
/// let q = delete("business").using(from("person").cross_join("company"));
/// assert_eq!(q.to_text().unwrap(), "DELETE FROM business USING person CROSS JOIN company");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FromList {
    sources: Vec<Arg>,
    // Keyed by the index of the source the join follows.
    joins: Vec<(usize, Join)>,
    build_error: Option<QbError>,
}

impl FromList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source.
    pub fn from(mut self, source: impl Into<Arg>) -> Self {
        self.push_source(source);
        self
    }

    pub(crate) fn push_source(&mut self, source: impl Into<Arg>) {
        self.sources.push(source.into());
    }

    /// Attach a join to the most recently added source.
    pub(crate) fn push_join(&mut self, join: Join) {
        match self.sources.len().checked_sub(1) {
            Some(last) => self.joins.push((last, join)),
            None => {
                if self.build_error.is_none() {
                    self.build_error = Some(QbError::sequence("cannot join before a FROM source"));
                }
            }
        }
    }

    /// `INNER JOIN table ON ...`
    pub fn join(mut self, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.push_join(Join::new(JoinKind::Inner, table, on));
        self
    }

    /// `LEFT JOIN table ON ...`
    pub fn left_join(mut self, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.push_join(Join::new(JoinKind::Left, table, on));
        self
    }

    /// `RIGHT JOIN table ON ...`
    pub fn right_join(mut self, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.push_join(Join::new(JoinKind::Right, table, on));
        self
    }

    /// `FULL JOIN table ON ...`
    pub fn full_join(mut self, table: impl Into<Arg>, on: impl Into<Clause>) -> Self {
        self.push_join(Join::new(JoinKind::Full, table, on));
        self
    }

    /// `CROSS JOIN table`
    pub fn cross_join(mut self, table: impl Into<Arg>) -> Self {
        self.push_join(Join::new(JoinKind::Cross, table, Clause::Empty));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fail with the first recorded sequencing error, if any.
    pub(crate) fn check(&self) -> QbResult<()> {
        match &self.build_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl SqlNode for FromList {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        self.check()?;
        let mut parts = Vec::with_capacity(self.sources.len());
        for (i, source) in self.sources.iter().enumerate() {
            let mut sql = render_ident(source, &mut *sink, ctx)?;
            for (_, join) in self.joins.iter().filter(|(ix, _)| *ix == i) {
                sql.push(' ');
                sql.push_str(&join.write_sql(&mut *sink, ctx)?);
            }
            parts.push(sql);
        }
        Ok(parts.join(", "))
    }
}
