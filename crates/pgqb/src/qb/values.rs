//! VALUES lists usable as a FROM source.

use crate::clause::Fields;
use crate::error::{QbError, QbResult};
use crate::qb::SqlNode;
use crate::qb::param::Sink;
use crate::quote::quote_ident;
use crate::render::{Ctx, render_value};
use crate::value::Value;

/// `(VALUES (...), (...)) alias(col, ...)`
///
/// Columns come from the first row. A column missing from a later row
/// renders as NULL.
///
/// ```
/// use pgqb::prelude::*;
///
/// let v = values([fields! { "id" => 1, "name" => "a" }, fields! { "id" => 2 }]).alias("v");
/// let p = v.to_params().unwrap();
/// assert_eq!(p.text, "(VALUES ($1, $2), ($3, $4)) v(id, name)");
/// assert_eq!(p.values[3], Value::Null);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Values {
    rows: Vec<Fields>,
    alias: Option<String>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = Fields>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Name the derived table. Required.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl SqlNode for Values {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        let Some(alias) = &self.alias else {
            return Err(QbError::malformed("values must have an alias"));
        };
        let Some(first) = self.rows.first() else {
            return Err(QbError::malformed("values must have at least one row"));
        };
        if first.is_empty() {
            return Err(QbError::malformed("values row has no columns"));
        }
        let keys: Vec<&str> = first.keys().collect();

        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut cells = Vec::with_capacity(keys.len());
            for key in &keys {
                match row.get(key) {
                    Some(value) => cells.push(render_value(value, &mut *sink, ctx, false)?),
                    None => cells.push(sink.bind(&Value::Null)),
                }
            }
            rows.push(format!("({})", cells.join(", ")));
        }

        let columns: Vec<String> = keys.iter().map(|k| quote_ident(k)).collect();
        Ok(format!(
            "(VALUES {}) {}({})",
            rows.join(", "),
            quote_ident(alias),
            columns.join(", ")
        ))
    }
}
