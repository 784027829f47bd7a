//! Interface metadata extraction for Verilog source files.
//!
//! This crate reads the externally visible surface of Verilog modules (names,
//! ports, parameters, `//#` documentation comments, section markers and the
//! conditional guards around each declaration) without building a full syntax
//! tree. Module bodies are skipped. The main entry points are [`parse`] for
//! in-memory text and [`parse_file`] for a path on disk.
//!
//! # Architecture
//!
//! - **Token table** ([`token`]): Per-state ordered regex rules with actions and
//!   stack transitions. The grammar is data, compiled once.
//! - **Tokenizer** ([`lexer`]): Lazy stack machine that walks the table and
//!   yields only tokens that carry an action.
//! - **Reducer** ([`parser`]): Folds tokens into [`VerilogModule`] records,
//!   tracking guards, port headers and the documentation target.
//! - **Records** ([`ast`]): Plain serializable values returned to callers.

#![warn(missing_docs)]

/// Interface records: modules, ports and parameters.
pub mod ast;
mod decl;
/// Error types for parsing.
pub mod error;
/// Stack-based scanner over the token table.
pub mod lexer;
/// Semantic reducer from tokens to module records.
pub mod parser;
/// Declarative token table for the Verilog grammar.
pub mod token;

use std::path::Path;

pub use ast::{
    is_array, Declaration, ObjectKind, PortMode, VerilogModule, VerilogObject, VerilogParameter,
};
pub use error::ParseError;
pub use lexer::{tokenize, Token, Tokenizer};
pub use parser::parse;
pub use token::{Action, LexState, TokenTable};

/// Reads and parses a Verilog source file.
///
/// The file is decoded as UTF-8. Read and decode failures are reported as
/// [`ParseError::Io`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<VerilogModule>, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("parsing {}", path.display());
    parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "module counter(input clk, output [3:0] q);").unwrap();
        writeln!(file, "endmodule").unwrap();
        let modules = parse_file(file.path()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].to_string(), "module counter [clk, q]");
    }

    #[test]
    fn parse_file_missing_path() {
        let err = parse_file("/nonexistent/vdoc/missing.v").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert!(err.to_string().contains("missing.v"));
    }

    #[test]
    fn reexports_cover_public_surface() {
        let modules = parse("module m #(parameter W = 2) (input [W-1:0] a); endmodule").unwrap();
        let module = &modules[0];
        assert_eq!(module.kind(), ObjectKind::Module);
        assert!(module.ports[0].is_array());
        assert!(is_array(&module.ports[0].data_type));
        assert_eq!(module.generics[0].mode, Some(PortMode::In));
    }
}
