// Helper functions to generate test graphs with various configurations

use graph_node_editor::GraphStore;

/// Two corner nodes connected to each other
pub fn corner_pair_json() -> &'static str {
    r#"{
        "nodes": [
            {
                "id": "a",
                "label": "A",
                "hemisphere": "left",
                "x": 0,
                "y": 0,
                "connections": ["b"],
                "content": {"title": "Node A", "body": "", "image": null}
            },
            {
                "id": "b",
                "label": "B",
                "hemisphere": "right",
                "x": 100,
                "y": 100,
                "connections": ["a"],
                "content": {"title": "Node B", "body": "", "image": null}
            }
        ]
    }"#
}

pub fn corner_pair_store() -> GraphStore {
    GraphStore::from_json_str(corner_pair_json())
}

/// Hub node connected to two satellites, which are also connected to
/// each other; the hub additionally carries external links
pub fn hub_json() -> &'static str {
    r#"{
        "nodes": [
            {
                "id": "center",
                "label": "Hub",
                "hemisphere": "center",
                "x": 50,
                "y": 50,
                "connections": ["left-1", "right-1"],
                "content": {
                    "title": "The Hub",
                    "body": "Start here.",
                    "image": null,
                    "links": [
                        {"label": "Site", "url": "https://example.com"}
                    ]
                }
            },
            {
                "id": "left-1",
                "label": "Left One",
                "hemisphere": "left",
                "x": 20,
                "y": 30,
                "connections": ["center", "right-1"]
            },
            {
                "id": "right-1",
                "label": "Right One",
                "hemisphere": "right",
                "x": 80,
                "y": 30,
                "connections": ["center", "left-1"]
            }
        ]
    }"#
}

pub fn hub_store() -> GraphStore {
    GraphStore::from_json_str(hub_json())
}

/// Assert the bidirectional-edge invariant over every node pair
pub fn assert_symmetric(store: &GraphStore) {
    for node in store.nodes() {
        for conn_id in &node.connections {
            let other = store
                .get(conn_id)
                .unwrap_or_else(|| panic!("{} connects to unknown node {}", node.id, conn_id));
            assert!(
                other.is_connected_to(&node.id),
                "connection {} -> {} is not mirrored",
                node.id,
                conn_id
            );
        }
    }
}
