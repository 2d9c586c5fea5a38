//! Parameter sinks for the two rendering modes.
//!
//! Rendering walks a tree once and hands every scalar it meets to a [`Sink`].
//! The inline sink quotes the scalar in place, while [`ParamList`] stores it and
//! answers with the next `$n` placeholder. Both modes therefore share a single
//! traversal and can only differ at the leaves.

use crate::quote::quote_literal;
use crate::value::Value;
use serde::Serialize;

#[cfg(feature = "postgres")]
use tokio_postgres::types::ToSql;

/// Receives scalars during rendering and returns the text to emit for them.
pub trait Sink {
    /// Emit `value`, returning its SQL text.
    fn bind(&mut self, value: &Value) -> String;
}

/// Inline sink: every scalar is escaped into the SQL text.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Inline;

impl Sink for Inline {
    fn bind(&mut self, value: &Value) -> String {
        quote_literal(value)
    }
}

/// An ordered list of bound values.
///
/// Placeholders are 1-based: the first pushed value is `$1`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParamList {
    values: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Add a value and return its 1-based index.
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.values.push(value.into());
        self.values.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the bound values in placeholder order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Take the bound values in placeholder order.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Drop every value past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }

    /// Get all parameters as references for tokio-postgres.
    #[cfg(feature = "postgres")]
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

impl Sink for ParamList {
    fn bind(&mut self, value: &Value) -> String {
        let idx = self.push(value.clone());
        format!("${idx}")
    }
}

/// The result of a parameterized render: SQL text plus its bound values.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Params {
    /// SQL text with `$n` placeholders.
    pub text: String,
    /// Values in placeholder order.
    pub values: Vec<Value>,
}

impl Params {
    /// Get all parameters as references for tokio-postgres.
    #[cfg(feature = "postgres")]
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_one_based_index() {
        let mut params = ParamList::new();
        assert!(params.is_empty());
        assert_eq!(params.push(10), 1);
        assert_eq!(params.push("x"), 2);
        assert_eq!(params.len(), 2);
        assert_eq!(params.values(), &[Value::Int(10), Value::from("x")]);
    }

    #[test]
    fn sinks_differ_only_in_leaf_text() {
        let v = Value::from("John");
        assert_eq!(Inline.bind(&v), "'John'");

        let mut params = ParamList::new();
        params.push(1);
        assert_eq!(params.bind(&v), "$2");
        assert_eq!(params.into_values(), vec![Value::Int(1), v]);
    }

    #[test]
    fn truncate_discards_tail() {
        let mut params = ParamList::new();
        params.push(1);
        params.push(2);
        params.truncate(1);
        assert_eq!(params.values(), &[Value::Int(1)]);
    }

    #[test]
    fn params_serialize_as_pair() {
        let p = Params {
            text: "SELECT $1".to_string(),
            values: vec![Value::Int(1)],
        };
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"text":"SELECT $1","values":[1]}"#
        );
    }
}
