//! Statement builders.
//!
//! Every builder here implements [`SqlNode`], so each can be rendered inline
//! with [`to_text`](SqlNode::to_text) or with placeholders through
//! [`to_params`](SqlNode::to_params), and each can be nested inside another
//! statement as a sub-query.
//!
//! # Usage
//!
//! ```
//! use pgqb::prelude::*;
//!
//! // SELECT
//! let p = select(["id", "name"])
//!     .from("users")
//!     .where_(fields! { "status" => "active" })
//!     .order_by_desc("created_at")
//!     .limit(20)
//!     .to_params()
//!     .unwrap();
//! assert_eq!(
//!     p.text,
//!     "SELECT id, name FROM users WHERE status = $1 ORDER BY created_at DESC LIMIT 20"
//! );
//!
//! // INSERT
//! let p = insert("users")
//!     .values(fields! { "username" => "alice", "email" => "alice@example.com" })
//!     .returning(["id"])
//!     .to_params()
//!     .unwrap();
//! assert_eq!(p.text, "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id");
//!
//! // UPDATE
//! let p = update("users")
//!     .set("status", "inactive")
//!     .where_(fields! { "id" => 42 })
//!     .to_params()
//!     .unwrap();
//! assert_eq!(p.text, "UPDATE users SET status = $1 WHERE id = $2");
//!
//! // DELETE
//! let p = delete("users").where_(fields! { "id" => 42 }).to_params().unwrap();
//! assert_eq!(p.text, "DELETE FROM users WHERE id = $1");
//! ```

mod delete;
mod expr;
mod from;
mod insert;
pub(crate) mod param;
mod select;
mod traits;
mod update;
mod values;

pub use delete::Delete;
pub use expr::Expr;
pub use from::{FromList, Join, JoinKind};
pub use insert::Insert;
pub use param::{ParamList, Params, Sink};
pub use select::{Order, Select};
pub use traits::SqlNode;
pub use update::Update;
pub use values::Values;

use crate::clause::Fields;
use crate::error::QbResult;
use crate::ident::quote_path;
use crate::node::Arg;
use crate::render::{Ctx, render_value};

/// Create a SELECT builder for the given columns. An empty list selects `*`.
///
/// # Example
/// ```
/// use pgqb::prelude::*;
///
/// let q = select(["id"]).from("users");
/// assert_eq!(q.to_text().unwrap(), "SELECT id FROM users");
/// ```
pub fn select<I, A>(columns: I) -> Select
where
    I: IntoIterator<Item = A>,
    A: Into<Arg>,
{
    Select::new().columns(columns)
}

/// Create an INSERT builder for the given table.
pub fn insert(table: impl Into<Arg>) -> Insert {
    Insert::new(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: impl Into<Arg>) -> Update {
    Update::new(table)
}

/// Create a DELETE builder for the given table.
///
/// There is no implicit guard against deleting every row.
pub fn delete(table: impl Into<Arg>) -> Delete {
    Delete::new(table)
}

/// Start a standalone FROM list, useful for `UPDATE ... FROM` and
/// `DELETE ... USING` sources that carry joins.
pub fn from(source: impl Into<Arg>) -> FromList {
    FromList::new().from(source)
}

/// Create a VALUES list. Name it with [`Values::alias`] before rendering.
pub fn values(rows: impl IntoIterator<Item = Fields>) -> Values {
    Values::new().rows(rows)
}

/// `col = value, ...` for SET lists.
pub(crate) fn assignments(fields: &Fields, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
    let mut parts = Vec::with_capacity(fields.len());
    for (column, value) in fields.iter() {
        let value = render_value(value, &mut *sink, ctx, false)?;
        parts.push(format!("{} = {value}", quote_path(column)));
    }
    Ok(parts.join(", "))
}

#[cfg(test)]
mod tests;
