use std::collections::HashSet;

use serde_json::{json, Value};

use crate::graph::VertexStore;

/// One label per vertex, indexed like the store. Defaults to the key.
pub fn default_labels<V>(store: &VertexStore<V>) -> Vec<String> {
    store
        .vertices()
        .iter()
        .map(|vertex| vertex.key.as_str().to_string())
        .collect()
}

fn roots<V>(store: &VertexStore<V>) -> Vec<usize> {
    store
        .vertices()
        .iter()
        .filter(|vertex| !vertex.has_successor)
        .map(|vertex| vertex.index)
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Layout {
    Tree,
    Flat,
}

struct Frame {
    node: usize,
    depth: usize,
    is_last: bool,
}

/// Each root followed by what must run before it.
pub fn render_tree<V>(store: &VertexStore<V>, labels: &[String]) -> String {
    render(store, labels, Layout::Tree)
}

pub fn render_flat<V>(store: &VertexStore<V>, labels: &[String]) -> String {
    render(store, labels, Layout::Flat)
}

fn render<V>(store: &VertexStore<V>, labels: &[String], layout: Layout) -> String {
    let mut out = String::new();
    let mut seen = HashSet::new();
    let mut work = Vec::new();
    // Tree continuation bars, four columns per depth.
    let mut prefix = String::new();

    for (idx, root) in roots(store).into_iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&labels[root]);
        out.push('\n');
        seen.insert(root);
        prefix.clear();
        push_children(store, root, 0, &mut work);

        while let Some(frame) = work.pop() {
            match layout {
                Layout::Tree => {
                    prefix.truncate(4 * frame.depth);
                    out.push_str(&prefix);
                    out.push_str(if frame.is_last { "`-- " } else { "|-- " });
                }
                Layout::Flat => {
                    for _ in 0..=frame.depth {
                        out.push_str("  ");
                    }
                }
            }
            out.push_str(&labels[frame.node]);
            if !seen.insert(frame.node) {
                out.push_str(" (seen)\n");
                continue;
            }
            out.push('\n');
            if layout == Layout::Tree {
                prefix.push_str(if frame.is_last { "    " } else { "|   " });
            }
            push_children(store, frame.node, frame.depth + 1, &mut work);
        }
    }
    out
}

/// Pushes `node`'s predecessors so the first one pops first.
fn push_children<V>(store: &VertexStore<V>, node: usize, depth: usize, work: &mut Vec<Frame>) {
    let children = &store.vertices()[node].predecessors;
    for (idx, child) in children.iter().enumerate().rev() {
        work.push(Frame {
            node: *child,
            depth,
            is_last: idx + 1 == children.len(),
        });
    }
}

pub fn render_dot<V>(store: &VertexStore<V>, labels: &[String]) -> String {
    let mut out = String::from("digraph precedence {\n");
    for vertex in store.vertices() {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\"];\n",
            escape_dot_label(vertex.key.as_str()),
            escape_dot_label(&labels[vertex.index])
        ));
    }
    for vertex in store.vertices() {
        for predecessor in &vertex.predecessors {
            let from = &store.vertices()[*predecessor];
            out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape_dot_label(from.key.as_str()),
                escape_dot_label(vertex.key.as_str())
            ));
        }
    }
    out.push_str("}\n");
    out
}

pub fn graph_to_json<V>(store: &VertexStore<V>) -> Value {
    let nodes: Vec<Value> = store
        .vertices()
        .iter()
        .map(|vertex| {
            json!({
                "index": vertex.index,
                "key": vertex.key.as_str(),
                "defined": vertex.value.is_some(),
            })
        })
        .collect();
    let edges: Vec<Value> = store
        .vertices()
        .iter()
        .flat_map(|vertex| {
            vertex.predecessors.iter().map(move |predecessor| {
                json!({
                    "from": store.vertices()[*predecessor].key.as_str(),
                    "to": vertex.key.as_str(),
                })
            })
        })
        .collect();
    json!({ "nodes": nodes, "edges": edges })
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
