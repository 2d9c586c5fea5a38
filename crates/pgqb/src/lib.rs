//! # pgqb
//!
//! Composable PostgreSQL statement trees.
//!
//! ## Features
//!
//! - **One tree, two renderings**: every node renders either as a single SQL
//!   string with values escaped inline, or as `$n`-parameterized SQL plus the
//!   ordered list of bound values
//! - **Shorthand conditions**: a [`Fields`] map, a `(column, operation)` pair,
//!   a list or a nested expression all normalize into one condition tree
//! - **Composable statements**: any statement nests inside another as a
//!   sub-query, a FROM source or a JSON value
//! - **Driver-agnostic values**: with the `postgres` feature, bound values pass
//!   straight to `tokio-postgres`
//!
//! ## Example
//!
//! ```
//! use pgqb::prelude::*;
//!
//! let q = select(["person.id", "person.name"])
//!     .from("person")
//!     .left_join("company", fields! { "person.company_id" => "company.id" })
//!     .where_(or!(fields! { "person.age" => gt(18) }, fields! { "person.admin" => true }))
//!     .order_by("person.name")
//!     .limit(10);
//!
//! let p = q.to_params().unwrap();
//! assert_eq!(
//!     p.text,
//!     "SELECT person.id, person.name FROM person \
//!      LEFT JOIN company ON person.company_id = company.id \
//!      WHERE (person.age > $1 OR person.admin = $2) \
//!      ORDER BY person.name LIMIT 10"
//! );
//! assert_eq!(p.values, vec![Value::from(18), Value::from(true)]);
//!
//! assert_eq!(
//!     q.to_text().unwrap(),
//!     "SELECT person.id, person.name FROM person \
//!      LEFT JOIN company ON person.company_id = company.id \
//!      WHERE (person.age > '18' OR person.admin = 't') \
//!      ORDER BY person.name LIMIT 10"
//! );
//! ```

pub mod clause;
pub mod error;
pub mod ident;
pub mod json;
pub mod node;
pub mod op;
pub mod prelude;
pub mod qb;
pub mod quote;
pub mod render;
pub mod value;

pub use clause::{Clause, Fields, and, exists, normalize, not, or};
pub use error::{QbError, QbResult};
pub use ident::{Ident, quote_path};
pub use json::{JsonItem, JsonObject, json, jsonb};
pub use node::{
    Alias, Aliasable, Arg, Literal, Node, Template, default_value, ident, raw, template, unknown,
    val,
};
pub use op::{
    Operation, Quantifier, between, eq, ge, gt, ilike, in_list, le, like, lt, ne, not_in,
};
pub use quote::{escape_pattern, quote_ident, quote_literal};
pub use render::Ctx;
pub use value::Value;

// Re-export the builders for easy access
pub use qb::{
    Delete, Expr, FromList, Insert, Join, JoinKind, Order, ParamList, Params, Select, Sink,
    SqlNode, Update, Values, delete, from, insert, select, update, values,
};
