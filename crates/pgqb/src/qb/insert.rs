//! INSERT statement builder.

use crate::clause::Fields;
use crate::error::{QbError, QbResult};
use crate::ident::quote_path;
use crate::node::{Arg, Node, ident};
use crate::qb::param::Sink;
use crate::qb::{SqlNode, assignments};
use crate::quote::quote_ident;
use crate::render::{Ctx, ident_list, render_ident, render_plain, render_value};

/// INSERT statement builder.
///
/// Rows come either from [`values`](Insert::values) or from a single
/// [`select`](Insert::select) sub-query, never both.
///
/// ```
/// use pgqb::prelude::*;
///
/// let q = insert("person")
///     .values(fields! { "id" => 1, "name" => "John" })
///     .on_conflict(["id"])
///     .do_update_columns(["name"]);
/// assert_eq!(
///     q.to_params().unwrap().text,
///     "INSERT INTO person (id, name) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Insert {
    table: Arg,
    /// Target columns for the sub-query form
    columns: Vec<Arg>,
    rows: Vec<Fields>,
    subquery: Option<Node>,
    /// ON CONFLICT target columns
    conflict: Option<Vec<Arg>>,
    /// ON CONFLICT ON CONSTRAINT name
    constraint: Option<String>,
    /// DO UPDATE SET assignments (first write wins)
    update: Fields,
    returning: Vec<Arg>,
    build_error: Option<QbError>,
}

impl Insert {
    /// Create a new INSERT builder.
    pub fn new(table: impl Into<Arg>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            subquery: None,
            conflict: None,
            constraint: None,
            update: Fields::new(),
            returning: Vec::new(),
            build_error: None,
        }
    }

    fn record_error(&mut self, err: QbError) {
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
    }

    /// Add a row. Columns are taken from the first row; columns missing from
    /// later rows render as `DEFAULT`.
    pub fn values(mut self, row: Fields) -> Self {
        if self.subquery.is_some() {
            self.record_error(QbError::sequence("a select statement already exists"));
            return self;
        }
        self.rows.push(row);
        self
    }

    /// Add several rows.
    pub fn values_many(mut self, rows: impl IntoIterator<Item = Fields>) -> Self {
        for row in rows {
            self = self.values(row);
        }
        self
    }

    /// Target columns for [`select`](Insert::select).
    pub fn columns<I, A>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Insert the rows produced by a sub-query.
    pub fn select(mut self, subquery: impl Into<Node>) -> Self {
        if self.subquery.is_some() {
            self.record_error(QbError::sequence("a select statement already exists"));
        } else if !self.rows.is_empty() {
            self.record_error(QbError::sequence("insert values already exist"));
        } else {
            self.subquery = Some(subquery.into());
        }
        self
    }

    /// `ON CONFLICT (columns)`
    pub fn on_conflict<I, A>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.conflict = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// `ON CONFLICT ON CONSTRAINT name`
    pub fn constraint(mut self, name: impl Into<String>) -> Self {
        self.constraint = Some(name.into());
        self
    }

    /// `DO NOTHING`, which is already the action when no update is set.
    pub fn do_nothing(self) -> Self {
        self
    }

    /// `DO UPDATE SET` explicit assignments.
    pub fn do_update(mut self, values: Fields) -> Self {
        for (column, value) in values.iter() {
            if !self.update.contains(column) {
                self.update.set(column, value.clone());
            }
        }
        self
    }

    /// `DO UPDATE SET col = EXCLUDED.col` for each column.
    pub fn do_update_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            let column = column.into();
            if !self.update.contains(&column) {
                let excluded = ident(format!("EXCLUDED.{column}"));
                self.update.set(column, excluded);
            }
        }
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

    fn write_rows(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        let Some(first) = self.rows.first() else {
            return Err(QbError::malformed("insert has no rows"));
        };
        if first.is_empty() {
            return Err(QbError::malformed("insert row has no columns"));
        }
        let keys: Vec<&str> = first.keys().collect();
        let quoted: Vec<String> = keys.iter().map(|k| quote_ident(k)).collect();

        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut values = Vec::with_capacity(keys.len());
            for key in &keys {
                match row.get(key) {
                    Some(value) => values.push(render_value(value, &mut *sink, ctx, false)?),
                    None => values.push("DEFAULT".to_string()),
                }
            }
            rows.push(format!("({})", values.join(", ")));
        }
        Ok(format!(" ({}) VALUES {}", quoted.join(", "), rows.join(", ")))
    }
}

impl SqlNode for Insert {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }

        let mut sql = format!("INSERT INTO {}", render_ident(&self.table, &mut *sink, ctx)?);

        match &self.subquery {
            Some(subquery) => {
                if !self.columns.is_empty() {
                    sql.push_str(&format!(" ({})", ident_list(&self.columns, &mut *sink, ctx)?));
                }
                sql.push(' ');
                sql.push_str(&render_plain(subquery, &mut *sink, ctx)?);
            }
            None => sql.push_str(&self.write_rows(&mut *sink, ctx)?),
        }

        if self.conflict.is_some() || self.constraint.is_some() {
            sql.push_str(" ON CONFLICT");
            if let Some(name) = &self.constraint {
                sql.push_str(" ON CONSTRAINT ");
                sql.push_str(&quote_path(name));
            } else if let Some(columns) = self.conflict.as_ref().filter(|c| !c.is_empty()) {
                sql.push_str(&format!(" ({})", ident_list(columns, &mut *sink, ctx)?));
            }
            if self.update.is_empty() {
                sql.push_str(" DO NOTHING");
            } else {
                sql.push_str(" DO UPDATE SET ");
                sql.push_str(&assignments(&self.update, &mut *sink, ctx)?);
            }
        }

        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&ident_list(&self.returning, sink, ctx)?);
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::node::default_value;
    use crate::qb::{insert, select};
    use crate::value::Value;

    #[test]
    fn test_single_row() {
        let q = insert("person").values(fields! { "name" => "John", "age" => 30 });
        let p = q.to_params().unwrap();
        assert_eq!(p.text, "INSERT INTO person (name, age) VALUES ($1, $2)");
        assert_eq!(p.values, vec![Value::from("John"), Value::Int(30)]);
    }

    #[test]
    fn test_missing_keys_render_default() {
        let q = insert("person")
            .values(fields! { "name" => "John", "age" => 30 })
            .values(fields! { "name" => "Mary" })
            .values(fields! { "name" => "Ann", "age" => default_value() });
        assert_eq!(
            q.to_params().unwrap().text,
            "INSERT INTO person (name, age) VALUES ($1, $2), ($3, DEFAULT), ($4, DEFAULT)"
        );
    }

    #[test]
    fn test_subquery() {
        let q = insert("archive")
            .columns(["id", "name"])
            .select(select(["id", "name"]).from("person"));
        assert_eq!(
            q.to_text().unwrap(),
            "INSERT INTO archive (id, name) SELECT id, name FROM person"
        );
    }

    #[test]
    fn test_sequencing_errors() {
        let sub = select(["id"]).from("person");
        let err = insert("t").values(fields! { "id" => 1 }).select(sub.clone()).to_text().unwrap_err();
        assert_eq!(err, QbError::sequence("insert values already exist"));

        let err = insert("t").select(sub.clone()).values(fields! { "id" => 1 }).to_text().unwrap_err();
        assert!(err.is_sequence());

        let err = insert("t").select(sub.clone()).select(sub).to_text().unwrap_err();
        assert!(err.is_sequence());
    }

    #[test]
    fn test_empty_insert_is_malformed() {
        assert!(insert("t").to_text().unwrap_err().is_malformed());
    }

    #[test]
    fn test_row_without_columns_is_malformed() {
        let err = insert("t").values(Fields::new()).to_text().unwrap_err();
        assert_eq!(err, QbError::malformed("insert row has no columns"));

        // Only the first row decides the column list.
        let q = insert("t").values(fields! { "id" => 1 }).values(Fields::new());
        assert_eq!(q.to_text().unwrap(), "INSERT INTO t (id) VALUES ('1'), (DEFAULT)");
    }

    #[test]
    fn test_conflict_do_nothing() {
        let q = insert("person")
            .values(fields! { "id" => 1 })
            .on_conflict(["id"])
            .do_nothing();
        assert_eq!(
            q.to_text().unwrap(),
            "INSERT INTO person (id) VALUES ('1') ON CONFLICT (id) DO NOTHING"
        );
    }

    #[test]
    fn test_conflict_on_constraint() {
        let q = insert("person")
            .values(fields! { "id" => 1, "name" => "x" })
            .constraint("person_pkey")
            .do_update(fields! { "name" => "y" });
        let p = q.to_params().unwrap();
        assert_eq!(
            p.text,
            "INSERT INTO person (id, name) VALUES ($1, $2) ON CONFLICT ON CONSTRAINT person_pkey DO UPDATE SET name = $3"
        );
    }

    #[test]
    fn test_update_first_write_wins() {
        let q = insert("person")
            .values(fields! { "id" => 1, "name" => "x" })
            .on_conflict(["id"])
            .do_update(fields! { "name" => "first" })
            .do_update(fields! { "name" => "second" })
            .do_update_columns(["name", "id"]);
        let p = q.to_params().unwrap();
        assert_eq!(
            p.text,
            "INSERT INTO person (id, name) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET name = $3, id = EXCLUDED.id"
        );
        assert_eq!(p.values[2], Value::from("first"));
    }

    #[test]
    fn test_returning() {
        let q = insert("person")
            .values(fields! { "name" => "John" })
            .returning(["id", "created_at"]);
        assert_eq!(
            q.to_params().unwrap().text,
            "INSERT INTO person (name) VALUES ($1) RETURNING id, created_at"
        );
    }
}
