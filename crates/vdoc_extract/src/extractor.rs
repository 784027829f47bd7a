//! Path-keyed extraction cache.
//!
//! A [`VerilogExtractor`] parses each path at most once. Entries are never
//! invalidated: a file edited after its first extraction keeps returning the
//! original declarations until the extractor is dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use vdoc_parser::{ObjectKind, VerilogObject};

use crate::error::ExtractError;

/// File extensions recognized as Verilog source, compared case-insensitively.
pub const VERILOG_EXTENSIONS: &[&str] = &["v", "vlog"];

/// Returns `true` if the path has a Verilog source extension.
pub fn is_verilog(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VERILOG_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Extracts module declarations from Verilog files, caching results by path.
#[derive(Debug, Default)]
pub struct VerilogExtractor {
    cache: HashMap<PathBuf, Vec<VerilogObject>>,
}

impl VerilogExtractor {
    /// Creates an extractor with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the declarations in `path`, optionally restricted to `kind`.
    ///
    /// The first request for a path reads and parses the file and stores the
    /// result. Later requests return the stored result without touching the
    /// filesystem. Failed extractions are not cached.
    pub fn extract_objects(
        &mut self,
        path: impl AsRef<Path>,
        kind: Option<ObjectKind>,
    ) -> Result<Vec<VerilogObject>, ExtractError> {
        let path = path.as_ref();
        if let Some(objects) = self.cache.get(path) {
            log::debug!("cache hit: {}", path.display());
            return Ok(filter_kind(objects, kind));
        }

        log::debug!("cache miss: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let objects = parse_objects(&text).map_err(|source| ExtractError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let filtered = filter_kind(&objects, kind);
        self.cache.insert(path.to_path_buf(), objects);
        Ok(filtered)
    }

    /// Parses `text` and returns its declarations, optionally restricted to
    /// `kind`. Never reads or populates the cache.
    pub fn extract_objects_from_source(
        &self,
        text: &str,
        kind: Option<ObjectKind>,
    ) -> Result<Vec<VerilogObject>, vdoc_parser::ParseError> {
        let objects = parse_objects(text)?;
        Ok(filter_kind(&objects, kind))
    }

    /// Returns `true` if a synthesized type string describes a vector or array.
    pub fn is_array(&self, data_type: &str) -> bool {
        vdoc_parser::is_array(data_type)
    }

    /// Returns the cached paths in sorted order.
    pub fn cached_paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.cache.keys().map(PathBuf::as_path).collect();
        paths.sort();
        paths
    }

    /// Returns the number of cached files.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn parse_objects(text: &str) -> Result<Vec<VerilogObject>, vdoc_parser::ParseError> {
    Ok(vdoc_parser::parse(text)?
        .into_iter()
        .map(VerilogObject::from)
        .collect())
}

fn filter_kind(objects: &[VerilogObject], kind: Option<ObjectKind>) -> Vec<VerilogObject> {
    objects
        .iter()
        .filter(|obj| kind.map_or(true, |k| obj.is_kind(k)))
        .cloned()
        .collect()
}
