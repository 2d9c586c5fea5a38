//! The node model.
//!
//! [`Node`] is the closed set of renderable SQL fragments. [`Arg`] is what the
//! builder API accepts wherever a caller may pass either a node, a scalar or a
//! nested list; how an `Arg` renders depends on the position it lands in (see
//! [`crate::render`]).

use crate::error::{QbError, QbResult};
use crate::ident::Ident;
use crate::json::JsonObject;
use crate::op::Operation;
use crate::qb::param::Sink;
use crate::qb::{Delete, Expr, FromList, Insert, Join, Select, SqlNode, Update, Values};
use crate::quote::quote_ident;
use crate::render::{Ctx, render_ident, render_value};
use crate::value::Value;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Any input accepted in a value or identifier position.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A scalar.
    Value(Value),
    /// A nested sequence, rendered as a tuple or an `ARRAY[...]`.
    List(Vec<Arg>),
    /// A node that renders itself.
    Node(Node),
}

impl Arg {
    /// Check if this is a text scalar.
    pub fn is_text(&self) -> bool {
        matches!(self, Arg::Value(Value::Text(_)))
    }

    /// Check if this is NULL, either bare or wrapped in a literal.
    ///
    /// Other falsy values (`0`, `''`) are not treated as null.
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Arg::Value(Value::Null) | Arg::Node(Node::Literal(Literal { value: Value::Null, .. }))
        )
    }

    /// Check if this is a full statement.
    pub fn is_statement(&self) -> bool {
        matches!(self, Arg::Node(node) if node.is_statement())
    }
}

/// A renderable SQL fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Quoted name or dotted path.
    Ident(Ident),
    /// A scalar in value position, optionally cast.
    Literal(Literal),
    /// Literal SQL text with embedded values.
    Template(Template),
    /// A value whose role is decided at render time.
    Unknown(Box<Arg>),
    /// `<target> AS <alias>`.
    Alias(Alias),
    /// A boolean expression.
    Expr(Expr),
    /// A comparison awaiting its column.
    Op(Operation),
    /// `json_build_object(...)` / `jsonb_build_object(...)`.
    Json(JsonObject),
    /// `(VALUES ...) alias(...)`.
    Values(Values),
    /// A FROM list with joins.
    From(FromList),
    /// A single join.
    Join(Join),
    Select(Box<Select>),
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
}

impl Node {
    /// Check if this node is a full statement.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Node::Select(_) | Node::Insert(_) | Node::Update(_) | Node::Delete(_)
        )
    }
}

impl SqlNode for Node {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        match self {
            Node::Ident(n) => n.write_sql(sink, ctx),
            Node::Literal(n) => n.write_sql(sink, ctx),
            Node::Template(n) => n.write_sql(sink, ctx),
            Node::Unknown(_) => Err(QbError::malformed(
                "unknown value rendered outside a value or identifier position",
            )),
            Node::Alias(n) => n.write_sql(sink, ctx),
            Node::Expr(n) => n.write_sql(sink, ctx),
            Node::Op(n) => n.write_sql(sink, ctx),
            Node::Json(n) => n.write_sql(sink, ctx),
            Node::Values(n) => n.write_sql(sink, ctx),
            Node::From(n) => n.write_sql(sink, ctx),
            Node::Join(n) => n.write_sql(sink, ctx),
            Node::Select(n) => n.write_sql(sink, ctx),
            Node::Insert(n) => n.write_sql(sink, ctx),
            Node::Update(n) => n.write_sql(sink, ctx),
            Node::Delete(n) => n.write_sql(sink, ctx),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    &[u8],
    serde_json::Value,
    DateTime<Utc>,
    Uuid,
);

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Arg::Value(v.map_or(Value::Null, Into::into))
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(v: Vec<T>) -> Self {
        Arg::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<Node> for Arg {
    fn from(v: Node) -> Self {
        Arg::Node(v)
    }
}

macro_rules! impl_from_node {
    ($($variant:ident($t:ty)),* $(,)?) => {
        $(
            impl From<$t> for Node {
                fn from(v: $t) -> Self {
                    Node::$variant(v)
                }
            }

            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Node(Node::$variant(v))
                }
            }
        )*
    };
}

impl_from_node!(
    Ident(Ident),
    Literal(Literal),
    Template(Template),
    Alias(Alias),
    Expr(Expr),
    Op(Operation),
    Json(JsonObject),
    Values(Values),
    From(FromList),
    Join(Join),
);

macro_rules! impl_from_statement {
    ($($variant:ident($t:ty)),* $(,)?) => {
        $(
            impl From<$t> for Node {
                fn from(v: $t) -> Self {
                    Node::$variant(Box::new(v))
                }
            }

            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Node(Node::$variant(Box::new(v)))
                }
            }
        )*
    };
}

impl_from_statement!(
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
);

/// A scalar rendered in value position, with an optional `::type` cast.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub(crate) value: Value,
    cast: Option<String>,
}

impl Literal {
    /// Append `::<ty>` to the rendered value.
    pub fn cast(mut self, ty: impl Into<String>) -> Self {
        self.cast = Some(ty.into());
        self
    }

    /// The wrapped value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl SqlNode for Literal {
    fn write_sql(&self, sink: &mut dyn Sink, _ctx: Ctx) -> QbResult<String> {
        let bound = sink.bind(&self.value);
        match &self.cast {
            Some(ty) => Ok(format!("{bound}::{ty}")),
            None => Ok(bound),
        }
    }
}

/// Literal SQL text interleaved with values.
///
/// Text segments are copied verbatim; every argument renders in value
/// position, so scalars are escaped or bound and statements are
/// parenthesized.
///
/// ```
/// use pgqb::prelude::*;
///
/// let count = Template::new().push("COUNT(").push_arg(ident("name")).push(")");
/// assert_eq!(count.to_text().unwrap(), "COUNT(name)");
///
/// let between = template("age BETWEEN ? AND ?", [18, 65]);
/// let p = between.to_params().unwrap();
/// assert_eq!(p.text, "age BETWEEN $1 AND $2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    // Always one more part than args.
    parts: Vec<String>,
    args: Vec<Arg>,
    build_error: Option<QbError>,
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

impl Template {
    /// Create an empty template.
    pub fn new() -> Self {
        Self {
            parts: vec![String::new()],
            args: Vec::new(),
            build_error: None,
        }
    }

    /// Append literal SQL text.
    pub fn push(mut self, text: &str) -> Self {
        if let Some(last) = self.parts.last_mut() {
            last.push_str(text);
        }
        self
    }

    /// Append a value.
    pub fn push_arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self.parts.push(String::new());
        self
    }
}

impl SqlNode for Template {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        let mut out = self.parts.first().cloned().unwrap_or_default();
        for (arg, part) in self.args.iter().zip(self.parts.iter().skip(1)) {
            out.push_str(&render_value(arg, &mut *sink, ctx, false)?);
            out.push_str(part);
        }
        Ok(out)
    }
}

/// `<target> AS <alias>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    target: Box<Arg>,
    name: String,
}

impl SqlNode for Alias {
    fn write_sql(&self, sink: &mut dyn Sink, ctx: Ctx) -> QbResult<String> {
        let target = render_ident(&self.target, sink, ctx)?;
        Ok(format!("{target} AS {}", quote_ident(&self.name)))
    }
}

/// Nodes that can be renamed with `AS`.
pub trait Aliasable: Into<Arg> + Sized {
    /// Render as `<self> AS <name>`.
    fn alias(self, name: impl Into<String>) -> Alias {
        Alias {
            target: Box::new(self.into()),
            name: name.into(),
        }
    }
}

impl Aliasable for Ident {}
impl Aliasable for Literal {}
impl Aliasable for Template {}
impl Aliasable for JsonObject {}
impl Aliasable for Select {}
impl Aliasable for Insert {}
impl Aliasable for Update {}
impl Aliasable for Delete {}

/// Create an identifier node.
pub fn ident(path: impl Into<String>) -> Ident {
    Ident::new(path)
}

/// Create a literal node.
pub fn val(value: impl Into<Value>) -> Literal {
    Literal {
        value: value.into(),
        cast: None,
    }
}

/// Create a template holding raw SQL text.
pub fn raw(text: impl Into<String>) -> Template {
    Template {
        parts: vec![text.into()],
        args: Vec::new(),
        build_error: None,
    }
}

/// Create a template from SQL with `?` markers, one per argument.
///
/// Write `??` for a literal `?`, such as the jsonb key operators:
/// `template("data ?? ?", ["k"])` renders `data ? $1`. A `?` left over after
/// the arguments run out is kept as text. Unused arguments make the template
/// fail to render. For SQL dense with `?`, build a [`Template`] with
/// [`push`](Template::push) and [`push_arg`](Template::push_arg) instead.
pub fn template<A: Into<Arg>>(sql: &str, args: impl IntoIterator<Item = A>) -> Template {
    let mut args = args.into_iter();
    let mut t = Template::new();
    let mut text = String::new();
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '?' {
            text.push(c);
            continue;
        }
        if chars.next_if_eq(&'?').is_some() {
            text.push('?');
            continue;
        }
        match args.next() {
            Some(arg) => {
                t = t.push(&text).push_arg(arg);
                text.clear();
            }
            None => text.push('?'),
        }
    }
    t = t.push(&text);
    let unused = args.count();
    if unused > 0 {
        t.build_error = Some(QbError::malformed(format!(
            "template has {unused} unused argument(s)"
        )));
    }
    t
}

/// Wrap a value whose role (identifier or literal) is decided at render time.
pub fn unknown(value: impl Into<Arg>) -> Node {
    Node::Unknown(Box::new(value.into()))
}

/// The `DEFAULT` keyword.
pub fn default_value() -> Template {
    raw("DEFAULT")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_binds_whole_value() {
        let lit = val(vec![1, 2]).cast("int[]");
        let p = lit.to_params().unwrap();
        assert_eq!(p.text, "$1::int[]");
        assert_eq!(p.values, vec![Value::from(vec![1, 2])]);
        assert_eq!(lit.to_text().unwrap(), "ARRAY['1', '2']::int[]");
    }

    #[test]
    fn template_markers() {
        let t = template("a = ? OR b = ?", [1, 2]);
        assert_eq!(t.to_params().unwrap().text, "a = $1 OR b = $2");
        assert_eq!(t.to_text().unwrap(), "a = '1' OR b = '2'");
    }

    #[test]
    fn template_extra_markers_stay_text() {
        let t = template("data ? 'key' AND id = ?", Vec::<Arg>::new());
        assert_eq!(t.to_text().unwrap(), "data ? 'key' AND id = ?");
    }

    #[test]
    fn template_doubled_marker_is_literal() {
        let t = template("data ?? ? AND tags ??| ?", [Arg::from("k"), Arg::from(Value::from(vec!["a", "b"]))]);
        let p = t.to_params().unwrap();
        assert_eq!(p.text, "data ? $1 AND tags ?| $2");
        assert_eq!(p.values.len(), 2);
        assert_eq!(t.to_text().unwrap(), "data ? 'k' AND tags ?| ARRAY['a', 'b']");
    }

    #[test]
    fn template_unused_args_fail() {
        let err = template("a = ?", [1, 2]).to_text().unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn template_renders_args_in_value_position() {
        let t = raw("EXISTS ").push_arg(crate::qb::select(["id"]).from("person"));
        assert_eq!(t.to_text().unwrap(), "EXISTS (SELECT id FROM person)");
    }

    #[test]
    fn alias_quotes_name() {
        assert_eq!(ident("person.name").alias("Name").to_text().unwrap(), "person.name AS \"Name\"");
        let p = val(1).alias("one").to_params().unwrap();
        assert_eq!(p.text, "$1 AS one");
    }

    #[test]
    fn null_detection() {
        assert!(Arg::from(None::<i32>).is_null());
        assert!(Arg::from(val(Value::Null)).is_null());
        assert!(!Arg::from(0).is_null());
        assert!(!Arg::from("").is_null());
        assert!(!Arg::from(val(0)).is_null());
    }

    #[test]
    fn bare_unknown_is_malformed() {
        assert!(unknown("x").to_text().unwrap_err().is_malformed());
    }

    #[test]
    fn default_keyword() {
        assert_eq!(default_value().to_text().unwrap(), "DEFAULT");
    }
}
