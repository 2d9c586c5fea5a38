//! Where-clause normalization.
//!
//! Statement builders accept conditions in several shorthand forms, all
//! converted into a [`Clause`] and then normalized into a single [`Expr`]:
//!
//! | input                          | normalized to                        |
//! |--------------------------------|--------------------------------------|
//! | `None` / [`Clause::Empty`]     | empty AND (no condition)             |
//! | an [`Expr`]                    | itself                               |
//! | any other node                 | [`Expr::Raw`]                        |
//! | `(column, operation)`          | `column <operation>`                 |
//! | `Vec` of clauses               | AND of each (OR under [`or`])        |
//! | [`Fields`]                     | AND of one condition per column      |
//!
//! A [`Fields`] value that is an [`Operation`] is applied to its column, a
//! null value becomes `IS NULL` and anything else becomes an equality whose
//! right-hand side is resolved at render time: inside a JOIN's ON clause a
//! text value names a column, everywhere else it is a string literal.

use crate::node::{Arg, Node, unknown};
use crate::op::Operation;
use crate::qb::Expr;

/// Condition input accepted by `where_`, `having`, joins and [`and`]/[`or`]/[`not`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Clause {
    /// No condition.
    #[default]
    Empty,
    /// An expression or any other node.
    Node(Node),
    /// A column paired with an operation.
    Pair(Arg, Operation),
    /// A sequence of clauses.
    List(Vec<Clause>),
    /// Column/value mapping.
    Fields(Fields),
}

impl From<Node> for Clause {
    fn from(v: Node) -> Self {
        Clause::Node(v)
    }
}

macro_rules! impl_clause_from_node {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Clause {
                fn from(v: $t) -> Self {
                    Clause::Node(Node::from(v))
                }
            }
        )*
    };
}

impl_clause_from_node!(
    Expr,
    crate::ident::Ident,
    crate::node::Literal,
    crate::node::Template,
    crate::json::JsonObject,
    crate::qb::Select,
);

impl From<Fields> for Clause {
    fn from(v: Fields) -> Self {
        Clause::Fields(v)
    }
}

impl<A: Into<Arg>> From<(A, Operation)> for Clause {
    fn from((column, op): (A, Operation)) -> Self {
        Clause::Pair(column.into(), op)
    }
}

impl<C: Into<Clause>> From<Vec<C>> for Clause {
    fn from(v: Vec<C>) -> Self {
        Clause::List(v.into_iter().map(Into::into).collect())
    }
}

impl<C: Into<Clause>> From<Option<C>> for Clause {
    fn from(v: Option<C>) -> Self {
        v.map_or(Clause::Empty, Into::into)
    }
}

/// Normalize a clause into an expression.
///
/// `or` selects the combinator used for sequences.
pub fn normalize(clause: Clause, or: bool) -> Expr {
    match clause {
        Clause::Empty => Expr::default(),
        Clause::Node(Node::Expr(expr)) => expr,
        Clause::Node(node) => Expr::Raw(Box::new(node)),
        Clause::Pair(column, op) => Expr::op(column, op),
        Clause::List(items) => {
            let exprs = items.into_iter().map(|c| normalize(c, or)).collect();
            if or { Expr::or(exprs) } else { Expr::and(exprs) }
        }
        Clause::Fields(fields) => Expr::and(fields.entries.into_iter().map(field_expr).collect()),
    }
}

fn field_expr((column, value): (String, Arg)) -> Expr {
    match value {
        Arg::Node(Node::Op(op)) => Expr::op(column, op),
        v if v.is_null() => Expr::op(column, Operation::Unary("IS NULL")),
        v => Expr::op(
            column,
            Operation::Compare {
                op: "=",
                value: Box::new(Arg::Node(unknown(v))),
                quantifier: None,
            },
        ),
    }
}

/// AND together any number of clauses.
pub fn and<I, C>(clauses: I) -> Expr
where
    I: IntoIterator<Item = C>,
    C: Into<Clause>,
{
    Expr::and(clauses.into_iter().map(|c| normalize(c.into(), false)).collect())
}

/// OR together any number of clauses. Sequences inside are OR-ed as well.
pub fn or<I, C>(clauses: I) -> Expr
where
    I: IntoIterator<Item = C>,
    C: Into<Clause>,
{
    Expr::or(clauses.into_iter().map(|c| normalize(c.into(), true)).collect())
}

/// Negate the AND of the given clauses.
pub fn not<I, C>(clauses: I) -> Expr
where
    I: IntoIterator<Item = C>,
    C: Into<Clause>,
{
    let mut exprs: Vec<Expr> = clauses.into_iter().map(|c| normalize(c.into(), false)).collect();
    if exprs.len() == 1 {
        if let Some(only) = exprs.pop() {
            return Expr::not(only);
        }
    }
    Expr::not(Expr::and(exprs))
}

/// `EXISTS (subquery)`
pub fn exists(subquery: impl Into<Node>) -> Expr {
    Expr::exists(subquery)
}

/// An insertion-ordered mapping of column names to values.
///
/// Setting a column twice replaces its value in place. Columns whose value is
/// absent (`set_opt(col, None)`) are dropped, which makes optional filters
/// easy to express.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
    entries: Vec<(String, Arg)>,
}

impl Fields {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column` to `value`.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Arg>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    /// Set `column` when `value` is present, otherwise remove it.
    pub fn set_opt<V: Into<Arg>>(&mut self, column: impl Into<String>, value: Option<V>) -> &mut Self {
        match value {
            Some(v) => self.set(column, v),
            None => {
                let column = column.into();
                self.entries.retain(|(k, _)| *k != column);
                self
            }
        }
    }

    /// Builder-style [`set`](Fields::set).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.set(column, value);
        self
    }

    /// Look up a column.
    pub fn get(&self, column: &str) -> Option<&Arg> {
        self.entries.iter().find(|(k, _)| k == column).map(|(_, v)| v)
    }

    /// Check if `column` is set.
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Arg>> FromIterator<(K, V)> for Fields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.set(k, v);
        }
        fields
    }
}

/// Build a [`Fields`] mapping.
///
/// ```
/// use pgqb::fields;
///
/// let f = fields! { "name" => "John", "age" => 42 };
/// assert_eq!(f.keys().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[macro_export]
macro_rules! fields {
    () => { $crate::Fields::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.set($key, $value); )+
        fields
    }};
}

/// AND together heterogeneous clauses.
#[macro_export]
macro_rules! and {
    ($($clause:expr),* $(,)?) => {{
        let clauses: ::std::vec::Vec<$crate::Clause> = ::std::vec![$($crate::Clause::from($clause)),*];
        $crate::and(clauses)
    }};
}

/// OR together heterogeneous clauses.
#[macro_export]
macro_rules! or {
    ($($clause:expr),* $(,)?) => {{
        let clauses: ::std::vec::Vec<$crate::Clause> = ::std::vec![$($crate::Clause::from($clause)),*];
        $crate::or(clauses)
    }};
}

/// Negate the AND of heterogeneous clauses.
#[macro_export]
macro_rules! not {
    ($($clause:expr),* $(,)?) => {{
        let clauses: ::std::vec::Vec<$crate::Clause> = ::std::vec![$($crate::Clause::from($clause)),*];
        $crate::not(clauses)
    }};
}
