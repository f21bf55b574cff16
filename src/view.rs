//! Pure derivations the renderer consumes: deduplicated edge lists,
//! neighbor lookup, node sizing, and focus states for the expanded-node
//! overlay. No DOM or drawing here; everything is computed from the
//! store so it can be tested headless.

use crate::{GraphStore, Hemisphere, Node};
use std::collections::HashSet;

/// Undirected edges of the graph, each pair listed once. Edges are
/// deduplicated by sorted id pair; connections pointing at unknown ids
/// are skipped. Order follows the first traversal that sees each edge,
/// so the output is stable for a given store.
pub fn edge_list(store: &GraphStore) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for node in store.nodes() {
        for conn_id in &node.connections {
            if store.get(conn_id).is_none() {
                continue;
            }

            let key = if node.id < *conn_id {
                (node.id.clone(), conn_id.clone())
            } else {
                (conn_id.clone(), node.id.clone())
            };
            if seen.insert(key) {
                edges.push((node.id.clone(), conn_id.clone()));
            }
        }
    }

    edges
}

/// Nodes connected to the given node, dangling ids filtered out
pub fn connected_nodes<'a>(store: &'a GraphStore, id: &str) -> Vec<&'a Node> {
    let Some(node) = store.get(id) else {
        return Vec::new();
    };

    node.connections
        .iter()
        .filter_map(|conn_id| store.get(conn_id))
        .collect()
}

/// Rendered radius for a node: the hub node is largest, other
/// center-hemisphere nodes slightly enlarged
pub fn node_radius(node: &Node) -> f64 {
    if node.id == "center" {
        12.0
    } else if node.hemisphere == Hemisphere::Center {
        8.0
    } else {
        6.0
    }
}

/// Visual state of a node while another node is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFocus {
    /// Nothing expanded; default styling
    Neutral,
    /// This node is the expanded one
    Expanded,
    /// Directly connected to the expanded node
    Connected,
    /// Unrelated to the expanded node; dimmed
    Faded,
}

/// Visual state of an edge while a node is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFocus {
    Neutral,
    Connected,
    Faded,
}

/// Classify a node for the expanded-overlay state
pub fn node_focus(store: &GraphStore, expanded_id: Option<&str>, id: &str) -> NodeFocus {
    let Some(expanded_id) = expanded_id else {
        return NodeFocus::Neutral;
    };

    if id == expanded_id {
        return NodeFocus::Expanded;
    }

    let connected = store
        .get(expanded_id)
        .is_some_and(|node| node.is_connected_to(id));
    if connected {
        NodeFocus::Connected
    } else {
        NodeFocus::Faded
    }
}

/// Classify an edge for the expanded-overlay state
pub fn edge_focus(expanded_id: Option<&str>, from: &str, to: &str) -> EdgeFocus {
    match expanded_id {
        None => EdgeFocus::Neutral,
        Some(id) if from == id || to == id => EdgeFocus::Connected,
        Some(_) => EdgeFocus::Faded,
    }
}
