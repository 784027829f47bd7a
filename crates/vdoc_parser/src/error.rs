//! Error types for tokenizing and reducing Verilog source text.

use std::path::PathBuf;

use crate::token::LexState;

/// Errors that abort a parse.
///
/// Every variant is unrecoverable: a text that fails partway through yields
/// no modules at all. Offsets are byte offsets into the parsed text and
/// lines are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No rule of the active lexer state matches at the cursor.
    #[error("no rule matches in state `{state}` at line {line} (offset {offset})")]
    Lexical {
        /// The lexer state on top of the stack.
        state: LexState,
        /// Byte offset of the cursor.
        offset: usize,
        /// Line of the cursor.
        line: usize,
    },

    /// A pop transition would have removed the root lexer state.
    #[error("lexer state stack underflow at line {line} (offset {offset})")]
    StateUnderflow {
        /// Byte offset of the popping match.
        offset: usize,
        /// Line of the popping match.
        line: usize,
    },

    /// An `` `endif `` was found with no open `` `ifdef ``/`` `ifndef ``.
    #[error("no matching '`ifdef' or '`ifndef' for the '`endif' at line {line}")]
    UnmatchedEndif {
        /// Line of the `` `endif ``.
        line: usize,
    },

    /// A module or the document ended while a guard was still open.
    #[error("'{}' is not terminated with a matching '`endif' (line {line})", .guard.replace('=', " "))]
    UnterminatedGuard {
        /// The innermost open guard, encoded as `<directive>=<name>`.
        guard: String,
        /// Line where the enclosing scope ended.
        line: usize,
    },

    /// A port header has a bracket structure other than range and array.
    #[error("unknown port format: {mode} {header} (line {line})")]
    UnknownPortFormat {
        /// The direction keyword of the header.
        mode: String,
        /// The raw remainder of the header after the direction keyword.
        header: String,
        /// Line of the header.
        line: usize,
    },

    /// The source file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Returns the 1-based line number of a byte offset in `text`.
pub(crate) fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
