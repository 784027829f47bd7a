//! Conformance test helpers for the vdoc extractor.
//!
//! Provides shared functions that run Verilog source text through the parser
//! and the cached extractor and return results shaped for assertions in
//! integration tests.

#![warn(missing_docs)]

use vdoc_config::ProjectConfig;
use vdoc_parser::{ParseError, PortMode, VerilogModule};

/// A port flattened to `(name, direction, type)` for compact assertions.
pub type PortRow = (String, PortMode, String);

/// Parses source text that is expected to succeed.
///
/// Panics with the parse error message otherwise.
pub fn extract(source: &str) -> Vec<VerilogModule> {
    vdoc_parser::parse(source).unwrap_or_else(|e| panic!("expected clean parse, got: {e}"))
}

/// Parses source text that is expected to fail, returning the error.
pub fn extract_err(source: &str) -> ParseError {
    match vdoc_parser::parse(source) {
        Ok(modules) => panic!(
            "expected parse failure, got {} module(s): {:?}",
            modules.len(),
            modules.iter().map(|m| m.name.as_str()).collect::<Vec<_>>()
        ),
        Err(e) => e,
    }
}

/// Parses source text and returns the module with the given name.
pub fn module_named(source: &str, name: &str) -> VerilogModule {
    extract(source)
        .into_iter()
        .find(|m| m.name == name)
        .unwrap_or_else(|| panic!("module `{name}` not found"))
}

/// Flattens a module's ports for comparison.
pub fn port_rows(module: &VerilogModule) -> Vec<PortRow> {
    module
        .ports
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                p.mode.unwrap_or(PortMode::Input),
                p.data_type.clone(),
            )
        })
        .collect()
}

/// Builds an expected port row.
pub fn row(name: &str, mode: PortMode, data_type: &str) -> PortRow {
    (name.to_string(), mode, data_type.to_string())
}

/// Creates a minimal `ProjectConfig` scanning the given source directories.
pub fn make_config(name: &str, dirs: &[&str]) -> ProjectConfig {
    let dirs: Vec<String> = dirs.iter().map(|d| format!("\"{d}\"")).collect();
    let toml_str = format!(
        r#"
[project]
name = "{name}"

[sources]
dirs = [{dirs}]
"#,
        dirs = dirs.join(", "),
    );
    vdoc_config::load_config_from_str(&toml_str).unwrap()
}
