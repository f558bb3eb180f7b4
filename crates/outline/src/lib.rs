//! # Mindmap Outline
//!
//! Converts a model-generated document outline into a strict tree for radial
//! mindmap rendering.
//!
//! ## Architecture
//!
//! ```text
//! Model output (untrusted text)
//!     │
//!     ├──> Payload Extraction
//!     │    ├─> <analysis>...</analysis> marker (case-insensitive)
//!     │    ├─> or the whole text when it is already JSON
//!     │    └─> decode → serde_json::Value, or nothing
//!     │
//!     ├──> Normalization
//!     │    ├─> classify each value: heading | content wrapper | leaf
//!     │    ├─> headings become nodes, wrappers flatten, leaves vanish
//!     │    └─> work stack + arena, bounded by depth/node ceilings
//!     │
//!     └──> OutlineNode { name, children } (placeholder when nothing usable)
//! ```
//!
//! ## Example
//!
//! ```rust
//! let raw = r#"Sure! <analysis>{"heading": {"level": 1, "text": "Intro", "content": [
//!     {"type": "paragraph", "text": "hi"},
//!     {"heading": {"level": 2, "text": "Background", "content": []}}
//! ]}}</analysis>"#;
//!
//! let tree = mindmap_outline::build_tree(raw);
//! assert_eq!(tree.name, "Intro");
//! assert_eq!(tree.children[0].name, "Background");
//!
//! let nothing = mindmap_outline::build_tree("no outline here");
//! assert_eq!(nothing.name, "No data available");
//! assert!(nothing.children.is_empty());
//! ```

mod assembler;
mod config;
mod error;
mod extractor;
mod normalizer;
mod prompt;
mod shape;
mod types;

pub use assembler::{build_tree, MindmapAssembler};
pub use config::OutlineConfig;
pub use error::{ExtractError, OutlineError, Result};
pub use extractor::{ExtractedPayload, PayloadExtractor};
pub use normalizer::OutlineNormalizer;
pub use prompt::{completion_content, ChatMessage, CompletionRequest, PromptConfig, Role};
pub use types::{BuildReport, OutlineNode, OutlineStats, PayloadSource};
