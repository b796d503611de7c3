use crate::{
    document::node::{Edge, Node, NodeId, Number, ResourceId, Value},
    document::resource::Resource,
    foundation::error::{PsbError, PsbResult},
    foundation::platform::Platform,
};

#[derive(Clone, Debug)]
/// A parsed PSB scene document.
///
/// All nodes live in an arena owned by the document and are addressed by [`NodeId`]. Parent
/// links are plain handles, so ancestor walks are bounded and never dangle. Nodes removed from
/// the tree stay in the arena, detached, until the document is dropped.
pub struct Document {
    pub(crate) nodes: Vec<Node>,
    pub(crate) resources: Vec<Resource>,
    root: NodeId,
    platform: Platform,
}

impl Document {
    /// Empty document with an empty top-level mapping.
    pub fn new(platform: Platform) -> Self {
        Self {
            nodes: vec![Node::detached(Value::empty_map())],
            resources: Vec::new(),
            root: NodeId(0),
            platform,
        }
    }

    /// The top-level `Objects` mapping.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Platform the document is currently encoded for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Retag the document. Does not touch any node.
    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = platform;
    }

    /// Payload of `id`.
    pub fn value(&self, id: NodeId) -> &Value {
        &self.nodes[id.index()].value
    }

    /// Parent container of `id`, `None` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Walk `depth` parent links up from `id`.
    pub fn ancestor(&self, id: NodeId, depth: usize) -> Option<NodeId> {
        let mut cur = id;
        for _ in 0..depth {
            cur = self.parent(cur)?;
        }
        Some(cur)
    }

    /// Edge that reaches `id` from its parent.
    pub fn edge(&self, id: NodeId) -> &Edge {
        &self.nodes[id.index()].edge
    }

    /// Mapping key `id` is stored under, if any.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.edge(id).name()
    }

    /// Slash-joined key path from the root to `id`.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut cur = Some(id);
        while let Some(node) = cur {
            match self.edge(node) {
                Edge::Key(k) => parts.push(k.clone()),
                Edge::Index(i) => parts.push(i.to_string()),
                Edge::Root => {}
            }
            cur = self.parent(node);
        }
        parts.reverse();
        parts.join("/")
    }

    /// Whether `id` is a mapping.
    pub fn is_map(&self, id: NodeId) -> bool {
        matches!(self.value(id), Value::Map(_))
    }

    /// Fail with [`PsbError::MalformedField`] unless `id` is a mapping.
    pub fn expect_map(&self, id: NodeId) -> PsbResult<()> {
        if self.is_map(id) {
            return Ok(());
        }
        Err(PsbError::malformed(format!(
            "'{}' is {}, expected map",
            self.path_of(id),
            self.value(id).kind()
        )))
    }

    /// Entry `key` of mapping `map`; `None` when absent or when `map` is not a mapping.
    pub fn get(&self, map: NodeId, key: &str) -> Option<NodeId> {
        match self.value(map) {
            Value::Map(entries) => entries.get(key).copied(),
            _ => None,
        }
    }

    /// Entry `key` of mapping `map`, failing with [`PsbError::MissingSection`] when absent.
    pub fn child(&self, map: NodeId, key: &str) -> PsbResult<NodeId> {
        self.expect_map(map)?;
        self.get(map, key).ok_or_else(|| {
            let base = self.path_of(map);
            if base.is_empty() {
                PsbError::missing_section(key)
            } else {
                PsbError::missing_section(format!("{base}/{key}"))
            }
        })
    }

    /// Top-level section `name` (e.g. `"object"`, `"source"`, `"metadata"`).
    pub fn section(&self, name: &str) -> PsbResult<NodeId> {
        self.child(self.root, name)
    }

    /// Whether mapping `map` has an entry `key`.
    pub fn contains_key(&self, map: NodeId, key: &str) -> bool {
        self.get(map, key).is_some()
    }

    /// Snapshot of `(key, child)` pairs of mapping `map`, in insertion order.
    pub fn entries(&self, map: NodeId) -> PsbResult<Vec<(String, NodeId)>> {
        match self.value(map) {
            Value::Map(entries) => Ok(entries.iter().map(|(k, v)| (k.clone(), *v)).collect()),
            other => Err(PsbError::malformed(format!(
                "'{}' is {}, expected map",
                self.path_of(map),
                other.kind()
            ))),
        }
    }

    /// Children of a mapping (values) or sequence (elements); empty for scalars.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.value(id) {
            Value::Map(entries) => entries.values().copied().collect(),
            Value::List(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// Number stored in `id`.
    pub fn as_number(&self, id: NodeId) -> Option<Number> {
        match self.value(id) {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text stored in `id`; the unset string yields `None`.
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.value(id) {
            Value::Text(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Number entry `key` of `map`.
    pub fn number(&self, map: NodeId, key: &str) -> PsbResult<Number> {
        let id = self.child(map, key)?;
        self.as_number(id).ok_or_else(|| {
            PsbError::malformed(format!(
                "'{}' is {}, expected number",
                self.path_of(id),
                self.value(id).kind()
            ))
        })
    }

    /// Text entry `key` of `map`, if present and set.
    pub fn text(&self, map: NodeId, key: &str) -> Option<&str> {
        self.get(map, key).and_then(|id| self.as_text(id))
    }

    /// String rendering of a scalar node.
    pub fn scalar_string(&self, id: NodeId) -> PsbResult<String> {
        match self.value(id) {
            Value::Text(s) => Ok(s.clone().unwrap_or_default()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok("null".to_string()),
            other => Err(PsbError::malformed(format!(
                "'{}' is {}, expected scalar",
                self.path_of(id),
                other.kind()
            ))),
        }
    }

    /// Insert or replace entry `key` of mapping `map`.
    ///
    /// A replaced entry keeps its position and the old node is detached. Children of a container
    /// `value` are re-parented onto the new node.
    pub fn insert(&mut self, map: NodeId, key: &str, value: Value) -> PsbResult<NodeId> {
        self.expect_map(map)?;
        self.put(map, key, value).ok_or_else(|| {
            PsbError::malformed(format!("'{}' is not a map", self.path_of(map)))
        })
    }

    /// [`Document::insert`] for callers that already checked `map` is a mapping; a non-map `map`
    /// is left untouched and yields `None`.
    pub(crate) fn put(&mut self, map: NodeId, key: &str, value: Value) -> Option<NodeId> {
        if !self.is_map(map) {
            return None;
        }
        let id = self.alloc(value);
        self.attach(id, map, Edge::Key(key.to_string()));

        let Value::Map(entries) = &mut self.nodes[map.index()].value else {
            return None;
        };
        if let Some(old) = entries.insert(key.to_string(), id) {
            self.detach(old);
        }
        Some(id)
    }

    /// Append `value` to sequence `list`.
    pub fn push(&mut self, list: NodeId, value: Value) -> PsbResult<NodeId> {
        let len = match self.value(list) {
            Value::List(items) => items.len(),
            other => {
                return Err(PsbError::malformed(format!(
                    "'{}' is {}, expected list",
                    self.path_of(list),
                    other.kind()
                )));
            }
        };
        let id = self.alloc(value);
        self.attach(id, list, Edge::Index(len));
        if let Value::List(items) = &mut self.nodes[list.index()].value {
            items.push(id);
        }
        Ok(id)
    }

    /// Remove entry `key` of mapping `map`, returning the detached node.
    pub fn remove(&mut self, map: NodeId, key: &str) -> Option<NodeId> {
        let Value::Map(entries) = &mut self.nodes[map.index()].value else {
            return None;
        };
        let old = entries.shift_remove(key)?;
        self.detach(old);
        Some(old)
    }

    /// Replace the payload of `id` in place, keeping its parent edge.
    pub fn set_value(&mut self, id: NodeId, value: Value) {
        for child in self.children(id) {
            self.detach(child);
        }
        self.nodes[id.index()].value = value;
        self.adopt_children(id);
    }

    /// Replace the payload of `id` with a number.
    pub fn set_number(&mut self, id: NodeId, number: Number) {
        self.set_value(id, Value::Number(number));
    }

    /// Append a resource to the resource table.
    pub fn add_resource(&mut self, resource: Resource) -> ResourceId {
        self.resources.push(resource);
        ResourceId((self.resources.len() - 1) as u32)
    }

    /// Resource table entry.
    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.index())
    }

    /// Mutable resource table entry.
    pub fn resource_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.resources.get_mut(id.index())
    }

    /// Number of resource table entries, reachable or not.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    fn alloc(&mut self, value: Value) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::detached(value));
        self.adopt_children(id);
        id
    }

    fn adopt_children(&mut self, id: NodeId) {
        let edges: Vec<(NodeId, Edge)> = match &self.nodes[id.index()].value {
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| (*v, Edge::Key(k.clone())))
                .collect(),
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (*v, Edge::Index(i)))
                .collect(),
            _ => return,
        };
        for (child, edge) in edges {
            self.attach(child, id, edge);
        }
    }

    fn attach(&mut self, id: NodeId, parent: NodeId, edge: Edge) {
        let node = &mut self.nodes[id.index()];
        node.parent = Some(parent);
        node.edge = edge;
    }

    fn detach(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.edge = Edge::Root;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/tree.rs"]
mod tests;
