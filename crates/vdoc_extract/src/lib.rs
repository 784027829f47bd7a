//! Cached extraction of Verilog interface declarations.
//!
//! This crate wraps [`vdoc_parser`] with a path-keyed result cache and kind
//! filtering, so documentation tools that ask about the same file repeatedly
//! only pay for one parse.

#![warn(missing_docs)]

/// Error types for extraction.
pub mod error;
/// The cached extractor facade.
pub mod extractor;

pub use error::ExtractError;
pub use extractor::{is_verilog, VerilogExtractor, VERILOG_EXTENSIONS};
