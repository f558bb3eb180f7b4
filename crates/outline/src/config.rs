use serde::{Deserialize, Serialize};

/// Configuration for payload extraction and outline normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutlineConfig {
    /// Tag name of the `<tag>...</tag>` marker wrapping the payload
    pub marker_tag: String,

    /// Accept model output that is itself a JSON object/array (no markers)
    pub accept_direct_payload: bool,

    /// Maximum heading levels below the root (hard limit)
    pub max_depth: usize,

    /// Maximum number of nodes in one tree, synthetic root included (hard limit)
    pub max_nodes: usize,

    /// Name of the single node returned when no outline can be derived
    pub placeholder_label: String,

    /// Name substituted for headings with missing or blank text
    pub untitled_label: String,

    /// Name of the synthetic root holding several top-level headings
    pub document_label: String,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            marker_tag: "analysis".to_string(),
            accept_direct_payload: true,
            max_depth: 32,
            max_nodes: 10_000,
            placeholder_label: "No data available".to_string(),
            untitled_label: "Untitled".to_string(),
            document_label: "Document".to_string(),
        }
    }
}

impl OutlineConfig {
    /// Only accept payloads wrapped in the marker
    pub fn strict() -> Self {
        Self {
            accept_direct_payload: false,
            ..Default::default()
        }
    }

    /// Cap the tree at the five heading levels the model is asked for
    pub fn compact() -> Self {
        Self {
            max_depth: 4,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_marker_tag(&self.marker_tag)?;

        if self.max_depth == 0 {
            return Err("max_depth must be > 0".to_string());
        }

        if self.max_nodes == 0 {
            return Err("max_nodes must be > 0".to_string());
        }

        for (field, value) in [
            ("placeholder_label", &self.placeholder_label),
            ("untitled_label", &self.untitled_label),
            ("document_label", &self.document_label),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} must not be blank"));
            }
        }

        Ok(())
    }
}

/// Marker tags are matched literally inside `<...>`, so keep them to a plain word
pub(crate) fn validate_marker_tag(tag: &str) -> Result<(), String> {
    if tag.is_empty() {
        return Err("marker_tag must not be empty".to_string());
    }

    if !tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(format!(
            "marker_tag ({tag}) may only contain ASCII letters, digits, '_' and '-'"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = OutlineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_configs_valid() {
        assert!(OutlineConfig::strict().validate().is_ok());
        assert!(OutlineConfig::compact().validate().is_ok());
        assert!(!OutlineConfig::strict().accept_direct_payload);
    }

    #[test]
    fn test_config_validation() {
        let mut config = OutlineConfig::default();

        config.marker_tag = String::new();
        assert!(config.validate().is_err());

        config.marker_tag = "ana lysis".to_string();
        assert!(config.validate().is_err());

        config.marker_tag = "outline-v2".to_string();
        assert!(config.validate().is_ok());

        config.max_depth = 0;
        assert!(config.validate().is_err());
        config.max_depth = 8;

        config.max_nodes = 0;
        assert!(config.validate().is_err());
        config.max_nodes = 100;

        config.untitled_label = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("untitled_label"), "{err}");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: OutlineConfig = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.marker_tag, "analysis");
        assert!(config.accept_direct_payload);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let parsed = serde_json::from_str::<OutlineConfig>(r#"{"max_deph": 3}"#);
        assert!(parsed.is_err());
    }
}
