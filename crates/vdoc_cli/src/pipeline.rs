//! Shared pipeline helpers for CLI commands.
//!
//! Contains project root resolution, configuration loading, source file
//! discovery, and the parallel parse-all-files step used by `scan`.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use vdoc_config::{ProjectConfig, CONFIG_FILE_NAME};
use vdoc_extract::{is_verilog, ExtractError};
use vdoc_parser::{VerilogModule, VerilogObject};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `vdoc.toml`.
///
/// Returns the directory containing `vdoc.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `vdoc.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Resolves the project root and loads its configuration.
///
/// An explicit `--config` file is loaded as given, so it need not be named
/// `vdoc.toml`.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let config = match global.config.as_deref().map(Path::new) {
        Some(path) if path.is_file() => vdoc_config::load_config_file(path)?,
        _ => vdoc_config::load_config(&root)?,
    };
    Ok((root, config))
}

/// Discovers Verilog source files under the configured source directories.
///
/// Each entry of `dirs` is resolved against `root` and walked recursively.
/// Files under any `exclude` prefix are skipped. Missing directories are
/// reported at `warn` level and contribute nothing. The result is sorted and
/// free of duplicates.
pub fn discover_source_files(
    root: &Path,
    dirs: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let excluded: Vec<PathBuf> = exclude.iter().map(|e| root.join(e)).collect();
    let mut files = Vec::new();
    for dir in dirs {
        let dir = root.join(dir);
        if !dir.is_dir() {
            log::warn!("source directory {} does not exist", dir.display());
            continue;
        }
        walk_dir(&dir, &excluded, &mut files)?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Recursively walks a directory collecting Verilog source files.
fn walk_dir(
    dir: &Path,
    excluded: &[PathBuf],
    files: &mut Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if excluded.iter().any(|prefix| path.starts_with(prefix)) {
            log::debug!("excluded {}", path.display());
            continue;
        }
        if path.is_dir() {
            walk_dir(&path, excluded, files)?;
        } else if is_verilog(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// The modules extracted from one source file.
#[derive(Debug, serde::Serialize)]
pub struct FileReport {
    /// The source path as given or discovered.
    pub path: PathBuf,
    /// Declarations found in the file.
    pub objects: Vec<VerilogObject>,
}

impl FileReport {
    /// Creates a report from parsed modules.
    pub fn from_modules(path: PathBuf, modules: Vec<VerilogModule>) -> Self {
        Self {
            path,
            objects: modules.into_iter().map(VerilogObject::from).collect(),
        }
    }
}

/// Parses every file in parallel, preserving input order.
///
/// Each file gets a fresh parse. The first failure, in input order, is
/// returned.
pub fn parse_all_files(files: &[PathBuf]) -> Result<Vec<FileReport>, ExtractError> {
    files
        .par_iter()
        .map(|path| -> Result<FileReport, ExtractError> {
            let text = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
                path: path.clone(),
                source,
            })?;
            let modules = vdoc_parser::parse(&text).map_err(|source| ExtractError::Parse {
                path: path.clone(),
                source,
            })?;
            Ok(FileReport::from_modules(path.clone(), modules))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}
