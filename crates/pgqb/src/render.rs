//! Value classification.
//!
//! An [`Arg`] can land in two roles. In *value* position scalars become
//! literals or placeholders; in *identifier* position text is read as a
//! (possibly dotted) name. Both entry points accept any `Arg` and dispatch on
//! its shape:
//!
//! 1. an unknown is resolved through the [`Ctx`],
//! 2. a statement is rendered and parenthesized,
//! 3. any other node renders itself,
//! 4. a list becomes a tuple or an `ARRAY[...]`,
//! 5. a scalar is handed to the sink (value) or quoted as a name (identifier).

use crate::error::{QbError, QbResult};
use crate::ident::quote_path;
use crate::node::{Arg, Node};
use crate::qb::param::{Inline, ParamList, Sink};
use crate::qb::SqlNode;
use crate::quote::quote_ident;
use crate::value::Value;

/// Rendering context threaded through every render call.
///
/// The only setting is identifier preference: inside a JOIN's ON clause a
/// textual unknown such as the `"company.id"` in `{company_id: "company.id"}`
/// is read as a column name instead of a string literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ctx {
    prefer_ident: bool,
}

impl Ctx {
    /// Context used for JOIN ... ON conditions.
    pub fn join_condition() -> Self {
        Self { prefer_ident: true }
    }

    /// Whether textual unknowns render as identifiers.
    pub fn prefers_ident(&self) -> bool {
        self.prefer_ident
    }
}

fn render_statement(node: &Node, sink: &mut dyn Sink) -> QbResult<String> {
    // Sub-statements never inherit the ON-clause preference.
    Ok(format!("({})", node.write_sql(sink, Ctx::default())?))
}

/// Render a node as-is, without the parentheses value position would add.
pub(crate) fn render_plain(node: &Node, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
    if node.is_statement() {
        node.write_sql(sink, Ctx::default())
    } else {
        node.write_sql(sink, ctx)
    }
}

/// Render `arg` in value position.
///
/// With `no_array` set, lists render as a parenthesized tuple (row values in
/// `IN (...)`) instead of an `ARRAY[...]` literal.
pub fn render_value(arg: &Arg, sink: &mut dyn Sink, ctx: Ctx, no_array: bool) -> QbResult<String> {
    match arg {
        Arg::Node(Node::Unknown(inner)) => {
            if ctx.prefer_ident && inner.is_text() {
                render_ident(inner, sink, ctx)
            } else {
                render_value(inner, sink, ctx, no_array)
            }
        }
        Arg::Node(node) if node.is_statement() => render_statement(node, sink),
        Arg::Node(node) => node.write_sql(sink, ctx),
        Arg::List(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(render_value(item, &mut *sink, ctx, no_array)?);
            }
            if no_array {
                Ok(format!("({})", parts.join(", ")))
            } else {
                Ok(format!("ARRAY[{}]", parts.join(", ")))
            }
        }
        Arg::Value(value) => Ok(sink.bind(value)),
    }
}

/// Render `arg` in identifier position.
///
/// Text is split into `prefix.name suffix` (see [`quote_path`]); lists render
/// as a tuple of names. NULL and non-textual composites have no identifier
/// form and fail with [`QbError::Malformed`].
pub fn render_ident(arg: &Arg, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
    match arg {
        Arg::Node(node) if node.is_statement() => render_statement(node, sink),
        Arg::Node(node) => node.write_sql(sink, ctx),
        Arg::List(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(render_ident(item, &mut *sink, ctx)?);
            }
            Ok(format!("({})", parts.join(", ")))
        }
        Arg::Value(Value::Text(path)) => Ok(quote_path(path)),
        Arg::Value(Value::Array(items)) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(render_ident(&Arg::Value(item.clone()), &mut *sink, ctx)?);
            }
            Ok(format!("({})", parts.join(", ")))
        }
        Arg::Value(value) => value
            .ident_text()
            .map(|name| quote_ident(&name))
            .ok_or_else(|| QbError::malformed(format!("{value:?} cannot be used as an identifier"))),
    }
}

/// Render each item in identifier position, comma-separated.
pub(crate) fn ident_list(items: &[Arg], sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        parts.push(render_ident(item, &mut *sink, ctx)?);
    }
    Ok(parts.join(", "))
}

/// Render `arg` in value position with every scalar inlined.
pub fn value_to_text(arg: &Arg) -> QbResult<String> {
    render_value(arg, &mut Inline, Ctx::default(), false)
}

/// Render `arg` in value position, binding scalars into `params`.
pub fn value_to_param(arg: &Arg, params: &mut ParamList) -> QbResult<String> {
    render_value(arg, params, Ctx::default(), false)
}

/// Render `arg` in identifier position with every scalar inlined.
pub fn ident_to_text(arg: &Arg) -> QbResult<String> {
    render_ident(arg, &mut Inline, Ctx::default())
}

/// Render `arg` in identifier position, binding scalars into `params`.
pub fn ident_to_param(arg: &Arg, params: &mut ParamList) -> QbResult<String> {
    render_ident(arg, params, Ctx::default())
}
