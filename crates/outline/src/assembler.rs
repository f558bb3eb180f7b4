use crate::config::OutlineConfig;
use crate::error::{OutlineError, Result};
use crate::extractor::PayloadExtractor;
use crate::normalizer::OutlineNormalizer;
use crate::types::{BuildReport, OutlineNode, PayloadSource};
use std::sync::OnceLock;

/// Turns raw model output into a mindmap tree
#[derive(Debug, Clone)]
pub struct MindmapAssembler {
    extractor: PayloadExtractor,
    normalizer: OutlineNormalizer,
}

impl MindmapAssembler {
    /// Create an assembler with a validated configuration
    pub fn new(config: OutlineConfig) -> Result<Self> {
        config.validate().map_err(OutlineError::invalid_config)?;
        Ok(Self {
            extractor: PayloadExtractor::new(&config)?,
            normalizer: OutlineNormalizer::new(config),
        })
    }

    /// Build the tree for `raw`. Unusable output yields the placeholder tree.
    #[must_use]
    pub fn build_tree(&self, raw: &str) -> OutlineNode {
        let value = self.extractor.extract(raw);
        self.normalizer.normalize(value.as_ref())
    }

    /// Build the tree and report where the payload came from
    #[must_use]
    pub fn build(&self, raw: &str) -> BuildReport {
        let (value, source, pruned) = match self.extractor.try_extract(raw) {
            Ok(payload) => (Some(payload.value), payload.source, payload.pruned),
            Err(_) => (None, PayloadSource::None, false),
        };
        let (tree, mut stats) = self.normalizer.normalize_with_stats(value.as_ref());
        stats.truncated |= pruned;
        BuildReport {
            tree,
            source,
            stats,
        }
    }

    /// The tree returned for unusable output
    #[must_use]
    pub fn placeholder(&self) -> OutlineNode {
        self.normalizer.placeholder()
    }
}

/// Build a tree from raw model output with the default configuration
#[must_use]
pub fn build_tree(raw: &str) -> OutlineNode {
    static DEFAULT: OnceLock<Option<MindmapAssembler>> = OnceLock::new();

    let assembler = DEFAULT.get_or_init(|| match MindmapAssembler::new(OutlineConfig::default()) {
        Ok(assembler) => Some(assembler),
        Err(err) => {
            log::error!("Default outline configuration rejected: {err}");
            None
        }
    });

    match assembler {
        Some(assembler) => assembler.build_tree(raw),
        None => OutlineNormalizer::default().placeholder(),
    }
}
