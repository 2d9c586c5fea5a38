//! PostgreSQL quoting primitives.
//!
//! These are the only functions that turn caller-provided text into SQL text.
//! Everything else in the crate goes through them at the leaves.

use crate::value::Value;
use chrono::{DateTime, Utc};
use std::fmt::Write;

// Sorted, lowercase. Looked up with `binary_search`.
const RESERVED: &[&str] = &[
    "all",
    "analyse",
    "analyze",
    "and",
    "any",
    "array",
    "as",
    "asc",
    "asymmetric",
    "authorization",
    "binary",
    "both",
    "case",
    "cast",
    "check",
    "collate",
    "collation",
    "column",
    "concurrently",
    "constraint",
    "create",
    "cross",
    "current_catalog",
    "current_date",
    "current_role",
    "current_schema",
    "current_time",
    "current_timestamp",
    "current_user",
    "default",
    "deferrable",
    "desc",
    "distinct",
    "do",
    "else",
    "end",
    "except",
    "false",
    "fetch",
    "for",
    "foreign",
    "freeze",
    "from",
    "full",
    "grant",
    "group",
    "having",
    "ilike",
    "in",
    "initially",
    "inner",
    "intersect",
    "into",
    "is",
    "isnull",
    "join",
    "lateral",
    "leading",
    "left",
    "like",
    "limit",
    "localtime",
    "localtimestamp",
    "natural",
    "not",
    "notnull",
    "null",
    "offset",
    "on",
    "only",
    "or",
    "order",
    "outer",
    "overlaps",
    "placing",
    "primary",
    "references",
    "returning",
    "right",
    "select",
    "session_user",
    "similar",
    "some",
    "symmetric",
    "table",
    "tablesample",
    "then",
    "to",
    "trailing",
    "true",
    "union",
    "unique",
    "user",
    "using",
    "variadic",
    "verbose",
    "when",
    "where",
    "window",
    "with",
];

fn is_bare_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
}

/// Quote an identifier for PostgreSQL.
///
/// Lowercase names that are not reserved words are returned unchanged;
/// everything else is double-quoted with embedded quotes doubled.
///
/// ```
/// use pgqb::quote::quote_ident;
///
/// assert_eq!(quote_ident("users"), "users");
/// assert_eq!(quote_ident("order"), "\"order\"");
/// assert_eq!(quote_ident("userId"), "\"userId\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    if is_bare_ident(name) && RESERVED.binary_search(&name).is_err() {
        return name.to_string();
    }
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let has_backslash = text.contains('\\');
    if has_backslash {
        out.push('E');
    }
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.3f+00:00").to_string()
}

fn format_float(f: f64) -> String {
    if f.is_infinite() {
        if f > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else {
        f.to_string()
    }
}

/// Quote a value as an inline SQL literal.
///
/// ```
/// use pgqb::quote::quote_literal;
/// use pgqb::Value;
///
/// assert_eq!(quote_literal(&Value::Null), "NULL");
/// assert_eq!(quote_literal(&Value::from("it's")), "'it''s'");
/// assert_eq!(quote_literal(&Value::from(42)), "'42'");
/// ```
pub fn quote_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "'t'".to_string(),
        Value::Bool(false) => "'f'".to_string(),
        Value::Int(i) => format!("'{i}'"),
        Value::Float(f) => format!("'{}'", format_float(*f)),
        Value::Text(s) => quote_string(s),
        Value::Bytes(b) => {
            let mut hex = String::with_capacity(b.len() * 2);
            for byte in b {
                let _ = write!(hex, "{byte:02x}");
            }
            format!("E'\\\\x{hex}'")
        }
        Value::Json(j) => format!("{}::jsonb", quote_string(&j.to_string())),
        Value::Timestamp(t) => format!("'{}'", format_timestamp(t)),
        Value::Uuid(u) => format!("'{u}'"),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(quote_literal).collect();
            format!("ARRAY[{}]", parts.join(", "))
        }
    }
}

/// Escape `\`, `%` and `_` so the text matches itself in a LIKE pattern.
///
/// ```
/// use pgqb::quote::escape_pattern;
///
/// assert_eq!(escape_pattern("50%_off"), "50\\%\\_off");
/// ```
pub fn escape_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
