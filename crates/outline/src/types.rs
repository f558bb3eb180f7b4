use serde::{Deserialize, Serialize};

/// A node of the canonical outline tree.
///
/// Serializes as `{"name": ..., "children": [...]}`, the shape hierarchical
/// layout renderers expect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineNode {
    /// Display label (heading text)
    pub name: String,

    /// Child headings in source order
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a node without children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Builder: append a child
    #[must_use]
    pub fn with_child(mut self, child: OutlineNode) -> Self {
        self.children.push(child);
        self
    }

    /// Check if this node has no children
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Count nodes in this subtree, self included
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Depth of the deepest node below this one (0 for a leaf)
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

/// Where the structured payload was found in model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSource {
    /// Between the begin/end marker
    Marker,
    /// The whole output was the payload
    Direct,
    /// Nothing usable
    None,
}

impl PayloadSource {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Direct => "direct",
            Self::None => "none",
        }
    }
}

/// Shape statistics gathered while normalizing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineStats {
    /// Nodes in the tree, root included
    pub node_count: usize,

    /// Deepest level reached (root = 0)
    pub max_depth: usize,

    /// Headings were dropped by the depth or node ceiling
    pub truncated: bool,
}

/// Tree plus diagnostics for one build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildReport {
    pub tree: OutlineNode,
    pub source: PayloadSource,
    pub stats: OutlineStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OutlineNode {
        OutlineNode::new("Intro")
            .with_child(OutlineNode::new("Background").with_child(OutlineNode::new("History")))
            .with_child(OutlineNode::new("Scope"))
    }

    #[test]
    fn test_node_count_and_depth() {
        let tree = sample();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 2);
        assert!(!tree.is_leaf());
        assert!(tree.children[1].is_leaf());
        assert_eq!(OutlineNode::new("x").depth(), 0);
    }

    #[test]
    fn test_serializes_renderer_shape() {
        let json = serde_json::to_value(OutlineNode::new("Intro")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Intro", "children": []}));
    }

    #[test]
    fn test_deserialize_without_children() {
        let node: OutlineNode = serde_json::from_str(r#"{"name":"Solo"}"#).unwrap();
        assert!(node.is_leaf());
    }

    #[test]
    fn test_payload_source_names() {
        assert_eq!(PayloadSource::Marker.as_str(), "marker");
        assert_eq!(
            serde_json::to_value(PayloadSource::Direct).unwrap(),
            serde_json::json!("direct")
        );
    }
}
