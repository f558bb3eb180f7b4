use crate::config::OutlineConfig;
use crate::shape::{label, OutlineShape};
use crate::types::{OutlineNode, OutlineStats};
use serde_json::Value;

/// Index of the virtual node collecting top-level headings
const TOP: usize = 0;

/// Heading node while the tree is being assembled
struct ArenaNode {
    name: String,
    children: Vec<usize>,
}

/// Value waiting to be visited
struct Visit<'a> {
    value: &'a Value,
    parent: usize,
    /// Depth a heading found here would get (top-level headings = 0)
    depth: usize,
}

/// Turns a decoded outline value into the canonical tree
#[derive(Debug, Clone)]
pub struct OutlineNormalizer {
    config: OutlineConfig,
}

impl OutlineNormalizer {
    #[must_use]
    pub fn new(config: OutlineConfig) -> Self {
        Self { config }
    }

    /// The single-node tree returned when no outline can be derived
    #[must_use]
    pub fn placeholder(&self) -> OutlineNode {
        OutlineNode::new(self.config.placeholder_label.clone())
    }

    /// Normalize a value into a tree. Never fails.
    #[must_use]
    pub fn normalize(&self, value: Option<&Value>) -> OutlineNode {
        self.normalize_with_stats(value).0
    }

    /// Normalize a value and report the resulting shape
    pub fn normalize_with_stats(&self, value: Option<&Value>) -> (OutlineNode, OutlineStats) {
        let placeholder = || {
            let stats = OutlineStats {
                node_count: 1,
                ..OutlineStats::default()
            };
            (self.placeholder(), stats)
        };

        let Some(value) = value else {
            return placeholder();
        };

        let walk = self.walk(value);
        let mut top = fold(walk.arena);
        let mut stats = OutlineStats {
            node_count: walk.headings,
            max_depth: walk.deepest,
            truncated: walk.truncated,
        };

        let tree = match top.len() {
            0 => return placeholder(),
            1 => top.remove(0),
            _ => {
                stats.node_count += 1;
                stats.max_depth += 1;
                OutlineNode {
                    name: self.config.document_label.clone(),
                    children: top,
                }
            }
        };

        if stats.truncated {
            log::warn!(
                "Outline truncated to {} nodes (max_depth={}, max_nodes={})",
                stats.node_count,
                self.config.max_depth,
                self.config.max_nodes
            );
        }

        (tree, stats)
    }

    fn walk(&self, value: &Value) -> Walk {
        let mut arena = vec![ArenaNode {
            name: String::new(),
            children: Vec::new(),
        }];
        let mut stack = vec![Visit {
            value,
            parent: TOP,
            depth: 0,
        }];
        let mut deepest = 0;
        let mut truncated = false;

        while let Some(Visit {
            value,
            parent,
            depth,
        }) = stack.pop()
        {
            match OutlineShape::classify(value) {
                OutlineShape::Heading { text, content } => {
                    if depth > self.config.max_depth {
                        truncated = true;
                        continue;
                    }
                    // A second top-level heading brings the synthetic root with it.
                    let tops = arena[TOP].children.len() + usize::from(parent == TOP);
                    if arena.len() + usize::from(tops > 1) > self.config.max_nodes {
                        truncated = true;
                        break;
                    }

                    let name = label(text).unwrap_or_else(|| self.config.untitled_label.clone());
                    let id = arena.len();
                    arena.push(ArenaNode {
                        name,
                        children: Vec::new(),
                    });
                    arena[parent].children.push(id);
                    deepest = deepest.max(depth);

                    push_items(&mut stack, OutlineShape::content_items(content), id, depth + 1);
                }
                OutlineShape::Wrapper(items) => {
                    push_items(&mut stack, items.as_slice(), parent, depth);
                }
                OutlineShape::Leaf => {}
            }
        }

        Walk {
            headings: arena.len() - 1,
            arena,
            deepest,
            truncated,
        }
    }
}

impl Default for OutlineNormalizer {
    fn default() -> Self {
        Self::new(OutlineConfig::default())
    }
}

struct Walk {
    arena: Vec<ArenaNode>,
    headings: usize,
    deepest: usize,
    truncated: bool,
}

/// Push items so they pop in source order
fn push_items<'a>(stack: &mut Vec<Visit<'a>>, items: &'a [Value], parent: usize, depth: usize) {
    stack.extend(items.iter().rev().map(|value| Visit {
        value,
        parent,
        depth,
    }));
}

/// Fold the arena into nested nodes, returning the top-level headings.
///
/// Children always have larger indices than their parent, so a reverse scan
/// builds every subtree before its parent needs it.
fn fold(mut arena: Vec<ArenaNode>) -> Vec<OutlineNode> {
    let mut built: Vec<Option<OutlineNode>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);

    for id in (1..arena.len()).rev() {
        let node = &mut arena[id];
        let children = node
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[id] = Some(OutlineNode {
            name: std::mem::take(&mut node.name),
            children,
        });
    }

    arena[TOP]
        .children
        .iter()
        .filter_map(|&child| built[child].take())
        .collect()
}
