//! Configuration types deserialized from `vdoc.toml`.

use serde::Deserialize;
use vdoc_parser::ObjectKind;

/// The top-level project configuration parsed from `vdoc.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Where to look for Verilog sources.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// How extracted interfaces are rendered.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Core project metadata required in every `vdoc.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Source discovery settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directories scanned recursively, relative to the project root.
    pub dirs: Vec<String>,
    /// Path prefixes, relative to the project root, that are skipped.
    pub exclude: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            dirs: vec!["src".to_string()],
            exclude: Vec::new(),
        }
    }
}

/// Rendering settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format.
    pub format: OutputFormat,
    /// Restricts output to one declaration kind.
    pub kind: Option<ObjectKind>,
}

/// Format for rendered interface listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text blocks.
    #[default]
    Text,
    /// Pretty-printed JSON records.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_default_to_src() {
        let sources = SourcesConfig::default();
        assert_eq!(sources.dirs, vec!["src"]);
        assert!(sources.exclude.is_empty());
    }

    #[test]
    fn output_defaults() {
        let output = OutputConfig::default();
        assert_eq!(output.format, OutputFormat::Text);
        assert_eq!(output.kind, None);
    }

    #[test]
    fn deserialize_output_section() {
        let output: OutputConfig = toml::from_str("format = \"json\"\nkind = \"module\"").unwrap();
        assert_eq!(output.format, OutputFormat::Json);
        assert_eq!(output.kind, Some(ObjectKind::Module));
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(toml::from_str::<OutputConfig>("format = \"yaml\"").is_err());
    }
}
