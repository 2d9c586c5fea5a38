//! SQL identifier handling.
//!
//! Identifiers are written as dotted paths with an optional trailing
//! modifier, e.g. `public.person.name`, `created_at DESC` or `person.*`.
//!
//! # Example
//! ```
//! use pgqb::ident::quote_path;
//!
//! assert_eq!(quote_path("public.person.name"), "public.person.name");
//! assert_eq!(quote_path("person.userId DESC"), "person.\"userId\" DESC");
//! assert_eq!(quote_path("EXCLUDED.name"), "EXCLUDED.name");
//! ```

use crate::error::QbResult;
use crate::qb::param::Sink;
use crate::qb::SqlNode;
use crate::quote::quote_ident;
use crate::render::Ctx;

/// Pseudo-relation holding the proposed row in `ON CONFLICT DO UPDATE`.
const EXCLUDED: &str = "EXCLUDED";

/// Quote a dotted identifier path.
///
/// The last `.` separates the prefix from the name, and the first space after
/// it separates the name from a suffix that is copied verbatim. Each prefix
/// segment is quoted on its own, except `EXCLUDED`, and a bare `*` name is
/// kept as-is.
pub fn quote_path(path: &str) -> String {
    let (prefix, rest) = match path.rfind('.') {
        Some(ix) => (Some(&path[..ix]), &path[ix + 1..]),
        None => (None, path),
    };
    let (name, suffix) = match rest.find(' ') {
        Some(ix) => (&rest[..ix], &rest[ix..]),
        None => (rest, ""),
    };

    let mut out = String::with_capacity(path.len() + 2);
    if let Some(prefix) = prefix {
        if prefix == EXCLUDED {
            out.push_str(EXCLUDED);
        } else {
            let segments: Vec<String> = prefix.split('.').map(quote_ident).collect();
            out.push_str(&segments.join("."));
        }
        out.push('.');
    }
    if name == "*" {
        out.push('*');
    } else {
        out.push_str(&quote_ident(name));
    }
    out.push_str(suffix);
    out
}

/// A SQL identifier (column, table, or schema name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    path: String,
    only: bool,
}

impl Ident {
    /// Create an identifier from a dotted path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            only: false,
        }
    }

    /// Render as `ONLY <table>`, excluding inherited tables.
    pub fn only(mut self) -> Self {
        self.only = true;
        self
    }

    /// The unquoted path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SqlNode for Ident {
    fn write_sql(&self, _sink: &mut dyn Sink, _ctx: Ctx) -> QbResult<String> {
        let quoted = quote_path(&self.path);
        if self.only {
            Ok(format!("ONLY {quoted}"))
        } else {
            Ok(quoted)
        }
    }
}
