// Graph Node Editor - Core Library

pub mod coords;
pub mod graph;
pub mod node;
pub mod publish;
pub mod serialization;
pub mod settings;
pub mod view;

// Re-export main types for convenience
pub use coords::{ViewBox, DEFAULT_VIEW};
pub use graph::{coerce_coordinate, GraphDocument, GraphStore};
pub use node::{Axis, ContentField, ContentLink, Hemisphere, Node, NodeContent};
pub use publish::{
    ContentHost, GitHubHost, PublishError, PublishPipeline, RetryPolicy,
};
pub use settings::Settings;
pub use view::{EdgeFocus, NodeFocus};
