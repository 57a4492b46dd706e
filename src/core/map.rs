use crate::core::key::{EntryKey, Keys};
use crate::graph::ops::{add_precedence, topological_order, walk};
use crate::graph::{Checkpoint, GraphError, Result, VertexStore};

/// Key/value entries iterated in an order that honours every `before`/`after`
/// constraint given to [`OrderedMap::add`].
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    store: VertexStore<V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            store: VertexStore::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update `key`, placing it before every key in `before` and
    /// after every key in `after`.
    ///
    /// Unknown constraint keys become placeholders without a value. When any
    /// constraint is rejected the map is left exactly as it was before the call.
    pub fn add(
        &mut self,
        key: impl Into<EntryKey>,
        value: V,
        before: impl Into<Keys>,
        after: impl Into<Keys>,
    ) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(GraphError::InvalidKey);
        }
        let before = before.into();
        let after = after.into();

        let mut checkpoint = self.store.checkpoint();
        let index = self.store.resolve(&key)?;
        let previous = self.store.set_value(index, value);

        if let Err(err) = self.link(index, &before, &after, &mut checkpoint) {
            if index < checkpoint.vertex_count() {
                self.store.replace_value(index, previous);
            }
            self.store.rollback(checkpoint);
            return Err(err);
        }
        Ok(())
    }

    pub fn insert(&mut self, key: impl Into<EntryKey>, value: V) -> Result<()> {
        self.add(key, value, Keys::none(), Keys::none())
    }

    fn link(
        &mut self,
        index: usize,
        before: &Keys,
        after: &Keys,
        checkpoint: &mut Checkpoint,
    ) -> Result<()> {
        for target in before {
            let successor = self.store.resolve(target)?;
            checkpoint.record(add_precedence(&mut self.store, index, successor)?);
        }
        for source in after {
            let predecessor = self.store.resolve(source)?;
            checkpoint.record(add_precedence(&mut self.store, predecessor, index)?);
        }
        Ok(())
    }

    /// Visit every entry in topological order. Placeholders carry `None`.
    pub fn each<F>(&self, visitor: F)
    where
        F: FnMut(&str, Option<&V>),
    {
        walk(&self.store, visitor);
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.store
            .find(key)
            .and_then(|index| self.store.vertex(index))
            .and_then(|vertex| vertex.value.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.find(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries().into_iter().map(|(key, _)| key).collect()
    }

    pub fn entries(&self) -> Vec<(&str, Option<&V>)> {
        let vertices = self.store.vertices();
        topological_order(&self.store)
            .into_iter()
            .map(|index| {
                let vertex = &vertices[index];
                (vertex.key.as_str(), vertex.value.as_ref())
            })
            .collect()
    }

    /// Keys that were only ever named as constraints, in insertion order.
    pub fn placeholders(&self) -> Vec<&str> {
        self.store
            .vertices()
            .iter()
            .filter(|vertex| vertex.value.is_none())
            .map(|vertex| vertex.key.as_str())
            .collect()
    }

    pub fn predecessors_of(&self, key: &str) -> Option<Vec<&str>> {
        let vertices = self.store.vertices();
        let vertex = vertices.get(self.store.find(key)?)?;
        Some(
            vertex
                .predecessors
                .iter()
                .map(|index| vertices[*index].key.as_str())
                .collect(),
        )
    }

    pub fn store(&self) -> &VertexStore<V> {
        &self.store
    }
}
