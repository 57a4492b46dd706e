use crate::graph::stack::{IndexStack, Marker};
use crate::graph::{GraphError, Result, VertexStore};

/// Outcome of a committed precedence edge, enough to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeChange {
    pub predecessor: usize,
    pub successor: usize,
    /// False when the edge already existed.
    pub appended: bool,
    pub had_successor: bool,
}

/// Per-pass traversal state. Allocated fresh for every walk and cycle check.
struct Scratch {
    visited: Vec<bool>,
    work: IndexStack,
    path: IndexStack,
}

impl Scratch {
    fn new(vertex_count: usize) -> Self {
        Self {
            visited: vec![false; vertex_count],
            work: IndexStack::with_capacity(vertex_count),
            path: IndexStack::new(),
        }
    }
}

/// Record that `predecessor` must be emitted before `successor`.
///
/// Both indices must come from [`VertexStore::resolve`]. Nothing is committed
/// when the edge would close a cycle.
pub fn add_precedence<V>(
    store: &mut VertexStore<V>,
    predecessor: usize,
    successor: usize,
) -> Result<EdgeChange> {
    if store.vertices[predecessor].key == store.vertices[successor].key {
        return Err(GraphError::SelfLoop {
            key: store.vertices[successor].key.clone(),
        });
    }

    if let Some(path) = find_path(store, predecessor, successor) {
        let chain = path
            .iter()
            .rev()
            .map(|index| store.vertices[*index].key.clone())
            .collect();
        return Err(GraphError::Cycle { chain });
    }

    let had_successor = store.vertices[predecessor].has_successor;
    let predecessors = &mut store.vertices[successor].predecessors;
    let appended = if predecessors.contains(&predecessor) {
        false
    } else {
        predecessors.push(predecessor);
        true
    };
    store.vertices[predecessor].has_successor = true;

    Ok(EdgeChange {
        predecessor,
        successor,
        appended,
        had_successor,
    })
}

/// Path `[from, .., target]` along predecessor edges, if `from` already
/// depends on `target`.
pub fn find_path<V>(store: &VertexStore<V>, from: usize, target: usize) -> Option<Vec<usize>> {
    if from == target {
        return Some(vec![from]);
    }

    let target_key = &store.vertices[target].key;
    let direct = &store.vertices[from].predecessors;
    if direct
        .iter()
        .any(|index| &store.vertices[*index].key == target_key)
    {
        return Some(vec![from, target]);
    }
    if direct.is_empty() {
        return None;
    }

    let mut scratch = Scratch::new(store.len());
    scratch.work.push_enter(from);
    while let Some(marker) = scratch.work.pop_marker() {
        match marker {
            Marker::Enter(index) => {
                if scratch.visited[index] {
                    continue;
                }
                scratch.visited[index] = true;
                scratch.path.push_enter(index);
                if index == target {
                    return Some(scratch.path.indices().collect());
                }
                scratch.work.push_exit(index);
                push_unvisited_predecessors(store, &mut scratch, index);
            }
            Marker::Exit(_) => {
                scratch.path.pop();
            }
        }
    }

    None
}

/// Vertex indices in emission order.
///
/// Vertices without a successor are roots, taken in insertion order; each root
/// is visited depth first with its predecessors in listing order.
pub fn topological_order<V>(store: &VertexStore<V>) -> Vec<usize> {
    let mut scratch = Scratch::new(store.len());
    let mut result = IndexStack::with_capacity(store.len());

    for root in store.vertices.iter().filter(|vertex| !vertex.has_successor) {
        scratch.work.push_enter(root.index);
        while let Some(marker) = scratch.work.pop_marker() {
            match marker {
                Marker::Enter(index) => {
                    if scratch.visited[index] {
                        continue;
                    }
                    scratch.visited[index] = true;
                    scratch.work.push_exit(index);
                    push_unvisited_predecessors(store, &mut scratch, index);
                }
                Marker::Exit(index) => result.push_enter(index),
            }
        }
    }

    debug_assert_eq!(result.len(), store.len());
    result.indices().collect()
}

pub fn walk<V, F>(store: &VertexStore<V>, mut visitor: F)
where
    F: FnMut(&str, Option<&V>),
{
    for index in topological_order(store) {
        let vertex = &store.vertices[index];
        visitor(vertex.key.as_str(), vertex.value.as_ref());
    }
}

fn push_unvisited_predecessors<V>(store: &VertexStore<V>, scratch: &mut Scratch, index: usize) {
    for predecessor in store.vertices[index].predecessors.iter().rev() {
        if !scratch.visited[*predecessor] {
            scratch.work.push_enter(*predecessor);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::key::EntryKey;
    use crate::graph::ops::{add_precedence, find_path, topological_order, walk};
    use crate::graph::{GraphError, VertexStore};

    fn resolve(store: &mut VertexStore<u32>, key: &str) -> usize {
        store.resolve(&EntryKey::new(key)).expect("resolve key")
    }

    fn order(store: &VertexStore<u32>) -> Vec<String> {
        let mut out = Vec::new();
        walk(store, |key, _| out.push(key.to_string()));
        out
    }

    fn chain_of(err: GraphError) -> Vec<String> {
        match err {
            GraphError::Cycle { chain } => chain.iter().map(|key| key.to_string()).collect(),
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn independent_vertices_follow_insertion_order() {
        let mut store = VertexStore::new();
        for key in ["x", "y", "z"] {
            resolve(&mut store, key);
        }
        assert_eq!(order(&store), vec!["x", "y", "z"]);
    }

    #[test]
    fn predecessors_are_emitted_in_listing_order() {
        let mut store = VertexStore::new();
        let target = resolve(&mut store, "target");
        let second = resolve(&mut store, "second");
        let first = resolve(&mut store, "first");
        add_precedence(&mut store, second, target).expect("second before target");
        add_precedence(&mut store, first, target).expect("first before target");
        assert_eq!(order(&store), vec!["second", "first", "target"]);
    }

    #[test]
    fn shared_predecessor_is_emitted_once() {
        let mut store = VertexStore::new();
        let a = resolve(&mut store, "a");
        let b = resolve(&mut store, "b");
        let c = resolve(&mut store, "c");
        let d = resolve(&mut store, "d");
        add_precedence(&mut store, a, b).expect("a before b");
        add_precedence(&mut store, a, c).expect("a before c");
        add_precedence(&mut store, b, d).expect("b before d");
        add_precedence(&mut store, c, d).expect("c before d");
        assert_eq!(order(&store), vec!["a", "b", "c", "d"]);
        assert_eq!(topological_order(&store), vec![a, b, c, d]);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut store = VertexStore::new();
        let a = resolve(&mut store, "a");
        let b = resolve(&mut store, "b");
        let first = add_precedence(&mut store, a, b).expect("first edge");
        let second = add_precedence(&mut store, a, b).expect("second edge");
        assert!(first.appended);
        assert!(!second.appended);
        assert!(second.had_successor);
        assert_eq!(store.vertex(b).expect("vertex b").predecessors, vec![a]);
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut store = VertexStore::new();
        let a = resolve(&mut store, "a");
        let err = add_precedence(&mut store, a, a).expect_err("self loop");
        assert_eq!(
            err,
            GraphError::SelfLoop {
                key: EntryKey::new("a")
            }
        );
        assert!(store.vertex(a).expect("vertex a").predecessors.is_empty());
        assert!(!store.vertex(a).expect("vertex a").has_successor);
    }

    #[test]
    fn direct_cycle_reports_two_keys() {
        let mut store = VertexStore::new();
        let a = resolve(&mut store, "a");
        let b = resolve(&mut store, "b");
        add_precedence(&mut store, a, b).expect("a before b");
        let err = add_precedence(&mut store, b, a).expect_err("b before a closes cycle");
        assert_eq!(chain_of(err), vec!["a", "b"]);
        assert!(store.vertex(a).expect("vertex a").predecessors.is_empty());
    }

    #[test]
    fn deep_cycle_reports_full_chain() {
        let mut store = VertexStore::new();
        let keys = ["a", "b", "c", "d"];
        let indices: Vec<usize> = keys.iter().map(|key| resolve(&mut store, key)).collect();
        for pair in indices.windows(2) {
            add_precedence(&mut store, pair[0], pair[1]).expect("chain edge");
        }
        let err = add_precedence(&mut store, indices[3], indices[0]).expect_err("closes cycle");
        assert_eq!(chain_of(err), vec!["a", "b", "c", "d"]);
        assert!(!store.vertex(indices[3]).expect("vertex d").has_successor);
        assert_eq!(order(&store), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn find_path_returns_none_for_unrelated_vertices() {
        let mut store = VertexStore::new();
        let a = resolve(&mut store, "a");
        let b = resolve(&mut store, "b");
        let c = resolve(&mut store, "c");
        add_precedence(&mut store, a, b).expect("a before b");
        assert_eq!(find_path(&store, b, c), None);
        assert_eq!(find_path(&store, a, b), None);
        assert_eq!(find_path(&store, b, a), Some(vec![b, a]));
    }

    #[test]
    fn walk_passes_placeholder_values_as_none() {
        let mut store = VertexStore::new();
        let a = resolve(&mut store, "a");
        let b = resolve(&mut store, "b");
        store.set_value(b, 7);
        add_precedence(&mut store, a, b).expect("a before b");

        let mut seen = Vec::new();
        walk(&store, |key, value| seen.push((key.to_string(), value.copied())));
        assert_eq!(
            seen,
            vec![("a".to_string(), None), ("b".to_string(), Some(7))]
        );
    }

    #[test]
    fn deep_chains_do_not_recurse() {
        let mut store = VertexStore::new();
        let count = 100_000;
        for step in 0..count {
            resolve(&mut store, &format!("n{step}"));
        }
        // Wired back to front so each cycle check starts from a vertex with no predecessors.
        for step in (0..count - 1).rev() {
            add_precedence(&mut store, step, step + 1).expect("chain edge");
        }
        let order = topological_order(&store);
        assert_eq!(order.len(), count);
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
