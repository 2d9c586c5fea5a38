//! Convenient imports for typical `pgqb` usage.
//!
//! ```
//! use pgqb::prelude::*;
//! ```

pub use crate::{and, fields, not, or};

pub use crate::{Aliasable, Arg, Clause, Fields, Template, Value, exists};
pub use crate::{Order, ParamList, Params, QbError, QbResult, SqlNode};
pub use crate::{default_value, ident, raw, template, unknown, val};
pub use crate::{between, eq, ge, gt, ilike, in_list, le, like, lt, ne, not_in};
pub use crate::{delete, from, insert, select, update, values};
pub use crate::{json, jsonb};
