//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `vdoc.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `vdoc.toml` could not be read (missing file or directory, permissions).
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// `vdoc.toml` is not valid TOML or does not match the `[project]`,
    /// `[sources]` and `[output]` schema (e.g. an unknown `output.format`).
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required value is absent or blank. Carries the dotted key, currently
    /// only `project.name`.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A value is present but unusable: `sources.dirs` is empty or lists a
    /// blank directory.
    #[error("validation error: {0}")]
    ValidationError(String),
}
