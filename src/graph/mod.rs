use std::collections::HashMap;

use thiserror::Error;

use crate::core::key::EntryKey;

pub mod builder;
pub mod ops;
pub mod stack;
pub mod viz;

pub use ops::EdgeChange;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("invalid key: keys must not be empty")]
    InvalidKey,
    #[error("cycle detected: {key} cannot precede itself")]
    SelfLoop { key: EntryKey },
    #[error("cycle detected: {}", format_chain(.chain))]
    Cycle { chain: Vec<EntryKey> },
}

pub type Result<T> = std::result::Result<T, GraphError>;

fn format_chain(chain: &[EntryKey]) -> String {
    let mut parts: Vec<&str> = chain.iter().map(EntryKey::as_str).collect();
    if let Some(first) = chain.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}

#[derive(Debug, Clone)]
pub struct Vertex<V> {
    pub index: usize,
    pub key: EntryKey,
    /// `None` while the vertex is only known through a constraint.
    pub value: Option<V>,
    /// Indices of vertices that must be emitted before this one, in listing order.
    pub predecessors: Vec<usize>,
    pub has_successor: bool,
}

/// Arena of vertices addressed by their insertion index.
#[derive(Debug, Clone)]
pub struct VertexStore<V> {
    vertices: Vec<Vertex<V>>,
    lookup: HashMap<EntryKey, usize>,
}

impl<V> Default for VertexStore<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

impl<V> VertexStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex<V>] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex<V>> {
        self.vertices.get(index)
    }

    pub fn find(&self, key: &str) -> Option<usize> {
        self.lookup.get(key).copied()
    }

    /// Index of the vertex for `key`, creating an empty vertex on first reference.
    pub fn resolve(&mut self, key: &EntryKey) -> Result<usize> {
        if key.is_empty() {
            return Err(GraphError::InvalidKey);
        }
        if let Some(index) = self.lookup.get(key) {
            return Ok(*index);
        }

        let index = self.vertices.len();
        self.vertices.push(Vertex {
            index,
            key: key.clone(),
            value: None,
            predecessors: Vec::new(),
            has_successor: false,
        });
        self.lookup.insert(key.clone(), index);
        Ok(index)
    }

    pub fn set_value(&mut self, index: usize, value: V) -> Option<V> {
        self.replace_value(index, Some(value))
    }

    pub fn replace_value(&mut self, index: usize, value: Option<V>) -> Option<V> {
        std::mem::replace(&mut self.vertices[index].value, value)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            vertex_count: self.vertices.len(),
            edges: Vec::new(),
        }
    }

    /// Undo every edge recorded in `checkpoint` and drop vertices created after it.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        for change in checkpoint.edges.iter().rev() {
            if change.appended {
                let popped = self.vertices[change.successor].predecessors.pop();
                debug_assert_eq!(popped, Some(change.predecessor));
            }
            self.vertices[change.predecessor].has_successor = change.had_successor;
        }

        for vertex in self.vertices.drain(checkpoint.vertex_count..) {
            self.lookup.remove(&vertex.key);
        }
    }
}

/// Store state captured before a multi-edge mutation.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    vertex_count: usize,
    edges: Vec<EdgeChange>,
}

impl Checkpoint {
    pub fn record(&mut self, change: EdgeChange) {
        self.edges.push(change);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}
