use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Scan settings loaded from `xray.toml`. Every section is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    #[serde(default)]
    pub text: TextSection,
    #[serde(default)]
    pub filters: FilterSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub executor: ExecutorSection,
}

/// How text content of views and composables is reported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextSection {
    /// Print text content, not just its length.
    #[serde(default)]
    pub render_value: bool,
    /// Truncate printed text to this many characters.
    #[serde(default)]
    pub max_length: Option<usize>,
}

/// Nodes left out of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// View resource-id names whose subtree is dropped.
    #[serde(default)]
    pub skip_ids: Vec<String>,
    /// Composable test tags whose subtree is dropped.
    #[serde(default)]
    pub skip_test_tags: Vec<String>,
    /// Only scan the window that has focus.
    #[serde(default)]
    pub focused_window_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub glyphs: GlyphStyle,
}

/// Characters used to draw tree branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    #[default]
    Unicode,
    Ascii,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorSection {
    /// Run the scan on a worker thread and give up after this many
    /// milliseconds. Unset runs the scan inline.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ScanConfig {
    /// Parse and validate config TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context("failed to parse scan config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read scan config at {}", path.display()))?;

        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid scan config at {}", path.display()))
    }

    /// Validate semantic constraints.
    pub fn validate(&self) -> Result<()> {
        if self.text.render_value && self.text.max_length == Some(0) {
            bail!("text.max_length must be greater than 0 when text.render_value is set");
        }

        validate_entries("filters.skip_ids", &self.filters.skip_ids)?;
        validate_entries("filters.skip_test_tags", &self.filters.skip_test_tags)?;

        if self.executor.timeout_ms == Some(0) {
            bail!("executor.timeout_ms must be greater than 0");
        }

        Ok(())
    }
}

fn validate_entries(field: &str, values: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();

    for value in values {
        if value.trim().is_empty() {
            bail!("{field} entries must not be empty");
        }
        if value.trim() != value {
            bail!("{field} entry {:?} has leading/trailing whitespace", value);
        }
        if !seen.insert(value.as_str()) {
            bail!("{field} contains duplicate entry {:?}", value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
[text]
render_value = true
max_length = 11

[filters]
skip_ids = ["debug_overlay", "ads"]
skip_test_tags = ["spinner"]
focused_window_only = true

[output]
glyphs = "ascii"

[executor]
timeout_ms = 500
"#;

    #[test]
    fn parses_full_config() {
        let config = ScanConfig::from_toml_str(FULL_CONFIG).unwrap();
        assert!(config.text.render_value);
        assert_eq!(config.text.max_length, Some(11));
        assert_eq!(config.filters.skip_ids, vec!["debug_overlay", "ads"]);
        assert_eq!(config.filters.skip_test_tags, vec!["spinner"]);
        assert!(config.filters.focused_window_only);
        assert_eq!(config.output.glyphs, GlyphStyle::Ascii);
        assert_eq!(config.executor.timeout_ms, Some(500));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ScanConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScanConfig::default());
        assert!(!config.text.render_value);
        assert_eq!(config.output.glyphs, GlyphStyle::Unicode);
        assert_eq!(config.executor.timeout_ms, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ScanConfig::from_toml_str("[text]\ncolour = true\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to parse scan config TOML"));
    }

    #[test]
    fn unknown_glyph_style_is_rejected() {
        let raw = FULL_CONFIG.replace("glyphs = \"ascii\"", "glyphs = \"emoji\"");
        assert!(ScanConfig::from_toml_str(&raw).is_err());
    }

    #[test]
    fn zero_max_length_with_value_is_rejected() {
        let raw = FULL_CONFIG.replace("max_length = 11", "max_length = 0");
        let err = ScanConfig::from_toml_str(&raw).unwrap_err().to_string();
        assert!(err.contains("text.max_length must be greater than 0"));
    }

    #[test]
    fn zero_max_length_without_value_is_accepted() {
        let raw = "[text]\nrender_value = false\nmax_length = 0\n";
        assert!(ScanConfig::from_toml_str(raw).is_ok());
    }

    #[test]
    fn duplicate_skip_ids_are_rejected() {
        let raw = FULL_CONFIG.replace("\"debug_overlay\", \"ads\"", "\"ads\", \"ads\"");
        let err = ScanConfig::from_toml_str(&raw).unwrap_err().to_string();
        assert!(err.contains("filters.skip_ids contains duplicate entry"));
    }

    #[test]
    fn padded_test_tags_are_rejected() {
        let raw = FULL_CONFIG.replace("[\"spinner\"]", "[\" spinner\"]");
        let err = ScanConfig::from_toml_str(&raw).unwrap_err().to_string();
        assert!(err.contains("has leading/trailing whitespace"));
    }

    #[test]
    fn blank_entries_are_rejected() {
        let raw = FULL_CONFIG.replace("[\"spinner\"]", "[\"  \"]");
        let err = ScanConfig::from_toml_str(&raw).unwrap_err().to_string();
        assert!(err.contains("filters.skip_test_tags entries must not be empty"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let raw = FULL_CONFIG.replace("timeout_ms = 500", "timeout_ms = 0");
        let err = ScanConfig::from_toml_str(&raw).unwrap_err().to_string();
        assert!(err.contains("executor.timeout_ms must be greater than 0"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ScanConfig::from_path(Path::new("/nonexistent/xray.toml"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("/nonexistent/xray.toml"));
    }
}
