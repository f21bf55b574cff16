use serde::{Deserialize, Serialize};

/// A node in the portfolio graph, representing a labeled, positioned piece
/// of content with bidirectional links to other nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique, stable identifier (human-readable, e.g. "flow-state")
    pub id: String,

    /// Display label shown next to the node
    pub label: String,

    /// Categorical tag used for visual grouping/coloring
    pub hemisphere: Hemisphere,

    /// Horizontal position as a percentage of the view width (0-100)
    pub x: u8,

    /// Vertical position as a percentage of the view height (0-100)
    pub y: u8,

    /// Ids of connected nodes. Semantically a set, but insertion order
    /// is preserved for deterministic export.
    #[serde(default)]
    pub connections: Vec<String>,

    /// Expanded-panel content. Lazily initialized by content edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<NodeContent>,
}

impl Node {
    /// Create a node with the editor's "new node" defaults
    pub fn with_defaults(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: "New Node".to_string(),
            hemisphere: Hemisphere::Center,
            x: 50,
            y: 50,
            connections: Vec::new(),
            content: Some(NodeContent {
                title: "New Node".to_string(),
                ..NodeContent::default()
            }),
            id,
        }
    }

    /// Check whether this node lists another node as connected
    pub fn is_connected_to(&self, other_id: &str) -> bool {
        self.connections.iter().any(|id| id == other_id)
    }

    /// Content with defaults filled in, as used by the exporter
    pub fn content_or_default(&self) -> NodeContent {
        self.content.clone().unwrap_or_default()
    }
}

/// Expanded-panel content attached to a node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeContent {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    /// Optional image reference; serialized as null when absent to keep
    /// the export field-complete
    #[serde(default)]
    pub image: Option<String>,

    /// Optional external links shown in the expanded panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<ContentLink>>,
}

/// A labeled external link in a node's content panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentLink {
    pub label: String,
    pub url: String,
}

/// Visual grouping tag for a node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Left,
    Right,
    #[default]
    Center,
}

impl Hemisphere {
    /// CSS-class-style name, as used in the rendered markup
    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::Left => "left",
            Hemisphere::Right => "right",
            Hemisphere::Center => "center",
        }
    }
}

impl std::fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position axis for coordinate edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Editable scalar fields of a node's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentField {
    Title,
    Body,
    Image,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_defaults() {
        let node = Node::with_defaults("new-node");

        assert_eq!(node.id, "new-node");
        assert_eq!(node.label, "New Node");
        assert_eq!(node.hemisphere, Hemisphere::Center);
        assert_eq!((node.x, node.y), (50, 50));
        assert!(node.connections.is_empty());

        let content = node.content.unwrap();
        assert_eq!(content.title, "New Node");
        assert_eq!(content.body, "");
        assert_eq!(content.image, None);
        assert_eq!(content.links, None);
    }

    #[test]
    fn test_is_connected_to() {
        let mut node = Node::with_defaults("a");
        node.connections.push("b".to_string());

        assert!(node.is_connected_to("b"));
        assert!(!node.is_connected_to("c"));
    }

    #[test]
    fn test_hemisphere_wire_format() {
        assert_eq!(serde_json::to_string(&Hemisphere::Left).unwrap(), "\"left\"");
        assert_eq!(
            serde_json::from_str::<Hemisphere>("\"center\"").unwrap(),
            Hemisphere::Center
        );
        assert!(serde_json::from_str::<Hemisphere>("\"north\"").is_err());
    }

    #[test]
    fn test_minimal_node_deserializes() {
        // Input documents may omit connections and content entirely
        let json = r#"{"id":"a","label":"A","hemisphere":"left","x":10,"y":20}"#;
        let node: Node = serde_json::from_str(json).unwrap();

        assert!(node.connections.is_empty());
        assert!(node.content.is_none());
        assert_eq!(node.content_or_default(), NodeContent::default());
    }

    #[test]
    fn test_content_image_serialized_when_null() {
        let content = NodeContent::default();
        let json = serde_json::to_string(&content).unwrap();

        // image stays in the payload as null; links is dropped when absent
        assert!(json.contains("\"image\":null"));
        assert!(!json.contains("links"));
    }
}
