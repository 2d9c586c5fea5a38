//! Trait definitions for renderable nodes.

use crate::error::QbResult;
use crate::qb::param::{Inline, ParamList, Params, Sink};
use crate::render::Ctx;

/// Base trait for everything that renders to SQL.
///
/// Implementors provide a single traversal, [`write_sql`](SqlNode::write_sql),
/// written against a [`Sink`]. The inline and parameterized renderings are
/// derived from it by swapping the sink, so the two can never disagree on
/// structure.
pub trait SqlNode {
    /// Render this node, handing every scalar to `sink`.
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String>;

    /// Render as a single SQL string with every value escaped inline.
    fn to_text(&self) -> QbResult<String> {
        self.write_sql(&mut Inline, Ctx::default())
    }

    /// Render with `$n` placeholders, appending bound values to `params`.
    ///
    /// Numbering continues from the values already in `params`. On error the
    /// list is truncated back to its length on entry.
    fn to_param(&self, params: &mut ParamList) -> QbResult<String> {
        let mark = params.len();
        let result = self.write_sql(&mut *params, Ctx::default());
        if result.is_err() {
            params.truncate(mark);
        }
        result
    }

    /// Render with `$n` placeholders into a fresh parameter list.
    fn to_params(&self) -> QbResult<Params> {
        let mut params = ParamList::new();
        let text = match self.to_param(&mut params) {
            Ok(text) => text,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(target: "pgqb.sql", error = %err, "render failed");
                return Err(err);
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pgqb.sql",
            param_count = params.len(),
            sql = %text,
            "rendered statement"
        );

        Ok(Params {
            text,
            values: params.into_values(),
        })
    }
}
