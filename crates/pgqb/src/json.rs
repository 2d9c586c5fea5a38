//! JSON object construction.
//!
//! ```
//! use pgqb::prelude::*;
//!
//! let obj = jsonb(["id", "name"]).prefix("p");
//! assert_eq!(obj.to_text().unwrap(), "jsonb_build_object('id', p.id, 'name', p.name)");
//! ```

use crate::clause::Fields;
use crate::error::QbResult;
use crate::ident::quote_path;
use crate::node::Arg;
use crate::qb::SqlNode;
use crate::qb::param::Sink;
use crate::quote::quote_literal;
use crate::render::{Ctx, render_ident};
use crate::value::Value;

/// One argument to a JSON object builder.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonItem {
    /// A column, used as both key and value.
    Key(String),
    /// Several columns, each used as both key and value.
    Keys(Vec<String>),
    /// Explicit key/value pairs. Values render in identifier position.
    Map(Fields),
}

impl From<&str> for JsonItem {
    fn from(v: &str) -> Self {
        JsonItem::Key(v.to_string())
    }
}

impl From<String> for JsonItem {
    fn from(v: String) -> Self {
        JsonItem::Key(v)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for JsonItem {
    fn from(v: [S; N]) -> Self {
        JsonItem::Keys(v.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for JsonItem {
    fn from(v: Vec<S>) -> Self {
        JsonItem::Keys(v.into_iter().map(Into::into).collect())
    }
}

impl From<Fields> for JsonItem {
    fn from(v: Fields) -> Self {
        JsonItem::Map(v)
    }
}

/// `json_build_object(...)` or `jsonb_build_object(...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonObject {
    items: Vec<JsonItem>,
    prefix: Option<String>,
    binary: bool,
}

impl JsonObject {
    fn new(item: JsonItem, binary: bool) -> Self {
        Self {
            items: vec![item],
            prefix: None,
            binary,
        }
    }

    /// Add more keys.
    pub fn json(mut self, item: impl Into<JsonItem>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Qualify bare keys with a table name or alias.
    ///
    /// Explicit [`JsonItem::Map`] values are never prefixed.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn write_key(&self, key: &str) -> String {
        let key_sql = quote_literal(&Value::Text(key.to_string()));
        match &self.prefix {
            Some(prefix) => format!("{key_sql}, {}.{}", quote_path(prefix), quote_path(key)),
            None => format!("{key_sql}, {}", quote_path(key)),
        }
    }
}

impl SqlNode for JsonObject {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        let mut parts = Vec::new();
        for item in &self.items {
            match item {
                JsonItem::Key(key) => parts.push(self.write_key(key)),
                JsonItem::Keys(keys) => parts.extend(keys.iter().map(|k| self.write_key(k))),
                JsonItem::Map(fields) => {
                    for (key, value) in fields.iter() {
                        let key_sql = quote_literal(&Value::Text(key.to_string()));
                        let value_sql = render_ident(value, &mut *sink, ctx)?;
                        parts.push(format!("{key_sql}, {value_sql}"));
                    }
                }
            }
        }
        let func = if self.binary { "jsonb_build_object" } else { "json_build_object" };
        Ok(format!("{func}({})", parts.join(", ")))
    }
}

/// Start a `json_build_object(...)`.
pub fn json(item: impl Into<JsonItem>) -> JsonObject {
    JsonObject::new(item.into(), false)
}

/// Start a `jsonb_build_object(...)`.
pub fn jsonb(item: impl Into<JsonItem>) -> JsonObject {
    JsonObject::new(item.into(), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::node::{Aliasable, template};

    #[test]
    fn single_key() {
        assert_eq!(json("name").to_text().unwrap(), "json_build_object('name', name)");
    }

    #[test]
    fn keys_are_inlined_in_param_mode() {
        let p = jsonb(vec!["id", "order"]).to_params().unwrap();
        assert_eq!(p.text, "jsonb_build_object('id', id, 'order', \"order\")");
        assert!(p.values.is_empty());
    }

    #[test]
    fn map_values_ignore_prefix() {
        let obj = jsonb("id")
            .json(fields! { "total" => template("SUM(?)", [Arg::from(crate::node::ident("amount"))]) })
            .prefix("o");
        assert_eq!(
            obj.to_text().unwrap(),
            "jsonb_build_object('id', o.id, 'total', SUM(amount))"
        );
    }

    #[test]
    fn map_values_bind_through_sink() {
        let obj = json(fields! { "x" => crate::node::val(5) });
        let p = obj.to_params().unwrap();
        assert_eq!(p.text, "json_build_object('x', $1)");
        assert_eq!(p.values, vec![Value::Int(5)]);
    }

    #[test]
    fn aliased() {
        let obj = jsonb("id").alias("data");
        assert_eq!(obj.to_text().unwrap(), "jsonb_build_object('id', id) AS data");
    }
}
