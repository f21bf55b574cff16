use crate::{Axis, ContentField, Hemisphere, Node, NodeContent};
use log::error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The on-disk and on-the-wire document shape: `{ "nodes": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
}

/// Owning store for the node graph. Source of truth for rendering and
/// the exclusive in-memory owner of all node data.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Nodes in document order
    nodes: Vec<Node>,

    /// Derived id -> position index, rebuilt on structural change
    index: HashMap<String, usize>,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a parsed document
    pub fn from_document(document: GraphDocument) -> Self {
        let mut store = Self {
            nodes: document.nodes,
            index: HashMap::new(),
        };
        store.rebuild_index();
        store
    }

    /// Build a store from raw JSON text. Malformed input degrades to an
    /// empty graph; the failure is logged, not returned.
    pub fn from_json_str(json: &str) -> Self {
        match serde_json::from_str::<GraphDocument>(json) {
            Ok(document) => Self::from_document(document),
            Err(err) => {
                error!("failed to parse node document, starting empty: {err}");
                Self::new()
            }
        }
    }

    /// Hardcoded single-node graph used by the viewer when the document
    /// is unreachable
    pub fn fallback() -> Self {
        let node = Node {
            id: "center".to_string(),
            label: "Home".to_string(),
            hemisphere: Hemisphere::Center,
            x: 50,
            y: 50,
            connections: Vec::new(),
            content: Some(NodeContent {
                title: "Welcome".to_string(),
                body: "The node map could not be loaded.".to_string(),
                ..NodeContent::default()
            }),
        };
        Self::from_document(GraphDocument { nodes: vec![node] })
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
    }

    // ========== Lookup ==========

    /// Get a node by id
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        let i = *self.index.get(id)?;
        Some(&mut self.nodes[i])
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes in the store
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========== Node CRUD ==========

    /// Insert a new node with editor defaults, allocating the next free
    /// id of the form `new-node`, `new-node-1`, ... by linear probing.
    /// Returns the allocated id.
    pub fn add_node(&mut self) -> String {
        const BASE_ID: &str = "new-node";

        let mut id = BASE_ID.to_string();
        let mut counter = 1;
        while self.index.contains_key(&id) {
            id = format!("{BASE_ID}-{counter}");
            counter += 1;
        }

        let position = self.nodes.len();
        self.nodes.push(Node::with_defaults(id.clone()));
        self.index.insert(id.clone(), position);
        id
    }

    /// Delete a node, removing it from every other node's connections
    /// first. No-op when the id is unknown.
    pub fn delete_node(&mut self, id: &str) {
        if !self.index.contains_key(id) {
            return;
        }

        for node in &mut self.nodes {
            node.connections.retain(|conn| conn != id);
        }
        self.nodes.retain(|node| node.id != id);
        self.rebuild_index();
    }

    // ========== Field edits ==========

    /// Update a node's display label. No-op when the id is unknown.
    pub fn set_label(&mut self, id: &str, label: &str) {
        if let Some(node) = self.get_mut(id) {
            node.label = label.to_string();
        }
    }

    /// Update a node's hemisphere tag. No-op when the id is unknown.
    pub fn set_hemisphere(&mut self, id: &str, hemisphere: Hemisphere) {
        if let Some(node) = self.get_mut(id) {
            node.hemisphere = hemisphere;
        }
    }

    /// Update one position coordinate from raw form input. The text is
    /// coerced to an integer (invalid or empty input becomes 0) and
    /// clamped to [0, 100]. No-op when the id is unknown.
    pub fn set_coordinate(&mut self, id: &str, axis: Axis, raw: &str) {
        let value = coerce_coordinate(raw);
        if let Some(node) = self.get_mut(id) {
            match axis {
                Axis::X => node.x = value,
                Axis::Y => node.y = value,
            }
        }
    }

    /// Update one content field, lazily initializing empty content on
    /// first edit. No-op when the id is unknown.
    pub fn set_content_field(&mut self, id: &str, field: ContentField, value: &str) {
        if let Some(node) = self.get_mut(id) {
            let content = node.content.get_or_insert_with(NodeContent::default);
            match field {
                ContentField::Title => content.title = value.to_string(),
                ContentField::Body => content.body = value.to_string(),
                ContentField::Image => {
                    content.image = (!value.is_empty()).then(|| value.to_string());
                }
            }
        }
    }

    // ========== Connections ==========

    /// Connect or disconnect two nodes. Both sides are updated together
    /// so the symmetry invariant holds after every call; repeated calls
    /// are idempotent. No-op when either id is unknown or both are equal.
    pub fn toggle_connection(&mut self, a_id: &str, b_id: &str, connected: bool) {
        if a_id == b_id || !self.index.contains_key(a_id) || !self.index.contains_key(b_id) {
            return;
        }

        if connected {
            self.insert_connection(a_id, b_id);
            self.insert_connection(b_id, a_id);
        } else {
            self.remove_connection(a_id, b_id);
            self.remove_connection(b_id, a_id);
        }
    }

    fn insert_connection(&mut self, from: &str, to: &str) {
        // Both ids were checked by the caller
        if let Some(node) = self.get_mut(from) {
            if !node.is_connected_to(to) {
                node.connections.push(to.to_string());
            }
        }
    }

    fn remove_connection(&mut self, from: &str, to: &str) {
        if let Some(node) = self.get_mut(from) {
            node.connections.retain(|id| id != to);
        }
    }

    // ========== Export ==========

    /// Produce the canonical, field-complete snapshot of the store.
    /// Every node carries all fields with content defaults filled in;
    /// key order follows the struct definitions, so the same in-memory
    /// state always serializes to the same bytes.
    pub fn export(&self) -> GraphDocument {
        GraphDocument {
            nodes: self
                .nodes
                .iter()
                .map(|node| Node {
                    content: Some(node.content_or_default()),
                    ..node.clone()
                })
                .collect(),
        }
    }
}

/// Coerce raw position input to an integer percent, clamped to [0, 100].
/// A leading integer prefix is honored ("42px" -> 42); anything else,
/// including empty input, becomes 0.
pub fn coerce_coordinate(raw: &str) -> u8 {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    let value: i64 = trimmed[..digits_end].parse().unwrap_or(0);
    value.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with_pair() -> GraphStore {
        let json = r#"{
            "nodes": [
                {"id": "a", "label": "A", "hemisphere": "left", "x": 0, "y": 0,
                 "connections": ["b"]},
                {"id": "b", "label": "B", "hemisphere": "right", "x": 100, "y": 100,
                 "connections": ["a"]}
            ]
        }"#;
        GraphStore::from_json_str(json)
    }

    #[test]
    fn test_load_and_index() {
        let store = store_with_pair();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().label, "A");
        assert_eq!(store.get("b").unwrap().hemisphere, Hemisphere::Right);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_malformed_input_degrades_to_empty() {
        let store = GraphStore::from_json_str("{ not json }");
        assert!(store.is_empty());

        // Wrong shape also degrades rather than panicking
        let store = GraphStore::from_json_str(r#"{"nodes": "nope"}"#);
        assert!(store.is_empty());
    }

    #[test]
    fn test_fallback_graph() {
        let store = GraphStore::fallback();
        assert_eq!(store.len(), 1);
        assert!(store.get("center").is_some());
    }

    #[test]
    fn test_add_node_probes_free_ids() {
        let mut store = GraphStore::new();

        assert_eq!(store.add_node(), "new-node");
        assert_eq!(store.add_node(), "new-node-1");
        assert_eq!(store.add_node(), "new-node-2");
        assert_eq!(store.len(), 3);

        // Deleting the base id frees it for the next probe
        store.delete_node("new-node");
        assert_eq!(store.add_node(), "new-node");
        assert_eq!(store.add_node(), "new-node-3");
    }

    #[test]
    fn test_delete_cascades_connections() {
        let mut store = store_with_pair();
        store.delete_node("a");

        assert_eq!(store.len(), 1);
        let b = store.get("b").unwrap();
        assert!(b.connections.is_empty());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = store_with_pair();
        store.delete_node("missing");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_coordinate_coerces_and_clamps() {
        let mut store = store_with_pair();

        store.set_coordinate("a", Axis::X, "42");
        assert_eq!(store.get("a").unwrap().x, 42);

        store.set_coordinate("a", Axis::X, "250");
        assert_eq!(store.get("a").unwrap().x, 100);

        store.set_coordinate("a", Axis::Y, "-5");
        assert_eq!(store.get("a").unwrap().y, 0);

        store.set_coordinate("a", Axis::Y, "");
        assert_eq!(store.get("a").unwrap().y, 0);

        store.set_coordinate("a", Axis::X, "37px");
        assert_eq!(store.get("a").unwrap().x, 37);

        store.set_coordinate("a", Axis::X, "abc");
        assert_eq!(store.get("a").unwrap().x, 0);
    }

    #[test]
    fn test_content_lazy_init() {
        let mut store = store_with_pair();
        assert!(store.get("a").unwrap().content.is_none());

        store.set_content_field("a", ContentField::Title, "Hello");
        let content = store.get("a").unwrap().content.as_ref().unwrap();
        assert_eq!(content.title, "Hello");
        assert_eq!(content.body, "");
        assert_eq!(content.image, None);

        store.set_content_field("a", ContentField::Body, "Body text");
        let content = store.get("a").unwrap().content.as_ref().unwrap();
        assert_eq!(content.title, "Hello");
        assert_eq!(content.body, "Body text");
    }

    #[test]
    fn test_toggle_connection_symmetric() {
        let mut store = store_with_pair();
        let id = store.add_node();

        store.toggle_connection("a", &id, true);
        assert!(store.get("a").unwrap().is_connected_to(&id));
        assert!(store.get(&id).unwrap().is_connected_to("a"));

        store.toggle_connection(&id, "a", false);
        assert!(!store.get("a").unwrap().is_connected_to(&id));
        assert!(!store.get(&id).unwrap().is_connected_to("a"));
    }

    #[test]
    fn test_toggle_connection_idempotent() {
        let mut store = store_with_pair();

        store.toggle_connection("a", "b", true);
        store.toggle_connection("a", "b", true);
        assert_eq!(store.get("a").unwrap().connections, vec!["b"]);
        assert_eq!(store.get("b").unwrap().connections, vec!["a"]);

        store.toggle_connection("a", "b", false);
        store.toggle_connection("a", "b", false);
        assert!(store.get("a").unwrap().connections.is_empty());
        assert!(store.get("b").unwrap().connections.is_empty());
    }

    #[test]
    fn test_toggle_connection_unknown_or_self_is_noop() {
        let mut store = store_with_pair();

        store.toggle_connection("a", "missing", true);
        store.toggle_connection("missing", "a", true);
        store.toggle_connection("a", "a", true);

        assert_eq!(store.get("a").unwrap().connections, vec!["b"]);
    }

    #[test]
    fn test_export_fills_content_defaults() {
        let mut store = GraphStore::new();
        store.add_node();
        store.set_content_field("new-node", ContentField::Title, "");
        let document = store.export();

        for node in &document.nodes {
            assert!(node.content.is_some());
        }

        // Node without any content edits still exports complete content
        let store = store_with_pair();
        let document = store.export();
        assert_eq!(
            document.nodes[0].content.as_ref().unwrap(),
            &NodeContent::default()
        );
    }

    #[test]
    fn test_export_is_deterministic() {
        let store = store_with_pair();
        let first = serde_json::to_string_pretty(&store.export()).unwrap();
        let second = serde_json::to_string_pretty(&store.export()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_coerce_coordinate() {
        assert_eq!(coerce_coordinate("0"), 0);
        assert_eq!(coerce_coordinate("100"), 100);
        assert_eq!(coerce_coordinate("101"), 100);
        assert_eq!(coerce_coordinate("+7"), 7);
        assert_eq!(coerce_coordinate("-1"), 0);
        assert_eq!(coerce_coordinate("  55  "), 55);
        assert_eq!(coerce_coordinate("12.9"), 12);
        assert_eq!(coerce_coordinate(""), 0);
        assert_eq!(coerce_coordinate("x10"), 0);
    }
}
