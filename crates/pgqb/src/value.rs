//! Scalar values carried by literals and bound as `$n` parameters.
//!
//! [`Value`] is the unit a parameter sink stores: every scalar met while
//! rendering a tree in parameterized mode ends up in the output list as one
//! `Value`, and in inline mode it is quoted in place by
//! [`quote_literal`](crate::quote::quote_literal).

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A bindable SQL scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary value (`bytea`).
    Bytes(Vec<u8>),
    /// JSON document (`jsonb`).
    Json(serde_json::Value),
    /// Timestamp with time zone.
    Timestamp(DateTime<Utc>),
    /// UUID value.
    Uuid(Uuid),
    /// Postgres array, bound as a single parameter.
    Array(Vec<Value>),
}

impl Value {
    /// Serialize any `serde` value into a JSON value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        Ok(Value::Json(serde_json::to_value(value)?))
    }

    /// Check if this is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text of a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used when a scalar lands in identifier position.
    ///
    /// NULL, bytes, JSON and arrays have no identifier form.
    pub(crate) fn ident_text(&self) -> Option<String> {
        match self {
            Value::Bool(true) => Some("t".to_string()),
            Value::Bool(false) => Some("f".to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Uuid(u) => Some(u.to_string()),
            Value::Timestamp(t) => Some(crate::quote::format_timestamp(t)),
            Value::Null | Value::Bytes(_) | Value::Json(_) | Value::Array(_) => None,
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(feature = "postgres")]
mod pg {
    use super::Value;
    use bytes::BytesMut;
    use std::error::Error;
    use tokio_postgres::types::{IsNull, Kind, ToSql, Type, WrongType, to_sql_checked};

    fn wrong_type(ty: &Type) -> Box<dyn Error + Sync + Send> {
        Box::new(WrongType::new::<Value>(ty.clone()))
    }

    // Values are dynamically typed, so `accepts` cannot know the variant.
    // Each arm checks the declared type before encoding.
    impl ToSql for Value {
        fn to_sql(
            &self,
            ty: &Type,
            out: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
            match self {
                Value::Null => Ok(IsNull::Yes),
                Value::Bool(b) => b.to_sql(ty, out),
                Value::Int(i) => match *ty {
                    Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                    Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                    Type::INT8 => i.to_sql(ty, out),
                    _ => Err(wrong_type(ty)),
                },
                Value::Float(f) => match *ty {
                    Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                    Type::FLOAT8 => f.to_sql(ty, out),
                    _ => Err(wrong_type(ty)),
                },
                Value::Text(s) => s.to_sql(ty, out),
                Value::Bytes(b) => b.to_sql(ty, out),
                Value::Json(j) => j.to_sql(ty, out),
                Value::Timestamp(t) => t.to_sql(ty, out),
                Value::Uuid(u) => u.to_sql(ty, out),
                Value::Array(items) => {
                    if !matches!(ty.kind(), Kind::Array(_)) {
                        return Err(wrong_type(ty));
                    }
                    items.to_sql(ty, out)
                }
            }
        }

        fn accepts(_ty: &Type) -> bool {
            true
        }

        to_sql_checked!();
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn array_into_scalar_type_is_an_error() {
            let mut buf = BytesMut::new();
            let v = Value::from(vec![1i64, 2]);
            assert!(v.to_sql_checked(&Type::INT8, &mut buf).is_err());
            assert!(v.to_sql_checked(&Type::INT8_ARRAY, &mut buf).is_ok());
        }

        #[test]
        fn numbers_check_declared_type() {
            let mut buf = BytesMut::new();
            assert!(Value::Int(1).to_sql_checked(&Type::TEXT, &mut buf).is_err());
            assert!(Value::Float(1.5).to_sql_checked(&Type::INT4, &mut buf).is_err());
            assert!(Value::Int(i64::MAX).to_sql_checked(&Type::INT4, &mut buf).is_err());

            buf.clear();
            Value::Int(7).to_sql_checked(&Type::INT4, &mut buf).unwrap();
            assert_eq!(&buf[..], &7i32.to_be_bytes());

            buf.clear();
            Value::Float(1.5).to_sql_checked(&Type::FLOAT4, &mut buf).unwrap();
            assert_eq!(&buf[..], &1.5f32.to_be_bytes());
        }

        #[test]
        fn array_elements_are_checked() {
            let mut buf = BytesMut::new();
            let v = Value::Array(vec![Value::Int(1), Value::Float(1.5)]);
            assert!(v.to_sql_checked(&Type::INT8_ARRAY, &mut buf).is_err());
        }
    }
}
