use std::fmt;

use indexmap::IndexMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Handle of a node inside a [`crate::Document`] arena.
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Index into a [`crate::Document`]'s resource table.
pub struct ResourceId(pub(crate) u32);

impl ResourceId {
    /// Position in the resource table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Label of the edge leading from a container to a node.
pub enum Edge {
    /// The document root, or a node not attached to any container.
    Root,
    /// Mapping entry key.
    Key(String),
    /// Sequence position.
    Index(usize),
}

impl Edge {
    /// Logical name of the node: the mapping key it is stored under.
    pub fn name(&self) -> Option<&str> {
        match self {
            Edge::Key(k) => Some(k.as_str()),
            Edge::Root | Edge::Index(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Numeric scalar, integer or floating.
pub enum Number {
    /// Integer value.
    Int(i64),
    /// Floating value.
    Float(f64),
}

impl Number {
    /// Integer view; floats are truncated.
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Int(v) => v,
            Number::Float(v) => v as i64,
        }
    }

    /// Floating view.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Node payload.
///
/// Container children are referenced by [`NodeId`]; inserting a container through
/// [`crate::Document::insert`] or [`crate::Document::push`] re-parents its children.
pub enum Value {
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(Number),
    /// Text; `None` is the unset string, distinct from `Some("")`.
    Text(Option<String>),
    /// Ordered sequence.
    List(Vec<NodeId>),
    /// Insertion-ordered mapping with unique keys.
    Map(IndexMap<String, NodeId>),
    /// Reference to an entry of the resource table.
    Resource(ResourceId),
}

impl Value {
    /// Text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(Some(s.into()))
    }

    /// Integer value.
    pub fn int(v: i64) -> Self {
        Value::Number(Number::Int(v))
    }

    /// Empty mapping.
    pub fn empty_map() -> Self {
        Value::Map(IndexMap::new())
    }

    /// Whether the value can hold children.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Resource(_) => "resource",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) value: Value,
    pub(crate) parent: Option<NodeId>,
    pub(crate) edge: Edge,
}

impl Node {
    pub(crate) fn detached(value: Value) -> Self {
        Self {
            value,
            parent: None,
            edge: Edge::Root,
        }
    }
}
