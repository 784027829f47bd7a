//! Stack-based scanner driven by a [`TokenTable`].
//!
//! The [`Tokenizer`] is a lazy, fused iterator. Each step tries the rules of
//! the state on top of the stack in declaration order and takes the first
//! rule that matches at the cursor. Only matches carrying an [`Action`] are
//! yielded; silent rules (comments, whitespace, skipped body text) just move
//! the cursor. The first error ends the sequence.

use crate::error::{line_of, ParseError};
use crate::token::{Action, LexState, TokenTable, Transition};

/// A scanned token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte offset where the match starts.
    pub offset: usize,
    /// Byte offset just past the match.
    pub end: usize,
    /// The action tag of the matching rule.
    pub action: Action,
    /// Capture groups of the match, excluding the whole match.
    pub groups: Vec<Option<&'a str>>,
}

impl<'a> Token<'a> {
    /// Returns capture group `index` (0-based, excluding the whole match).
    pub fn group(&self, index: usize) -> Option<&'a str> {
        self.groups.get(index).copied().flatten()
    }
}

/// Lazy scanner over a source text.
pub struct Tokenizer<'a> {
    text: &'a str,
    pos: usize,
    stack: Vec<LexState>,
    table: &'a TokenTable,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a scanner over `text` using the built-in Verilog grammar.
    pub fn new(text: &'a str) -> Self {
        Self::with_table(text, TokenTable::verilog())
    }

    /// Creates a scanner over `text` using a custom grammar.
    pub fn with_table(text: &'a str, table: &'a TokenTable) -> Self {
        Self {
            text,
            pos: 0,
            stack: vec![LexState::Root],
            table,
            finished: false,
        }
    }

    /// Returns the state on top of the stack.
    pub fn state(&self) -> LexState {
        self.stack.last().copied().unwrap_or(LexState::Root)
    }

    /// Returns the current cursor offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the current stack depth (1 at top level).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn fail(&mut self, err: ParseError) -> Option<Result<Token<'a>, ParseError>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let text: &'a str = self.text;
        let table: &'a TokenTable = self.table;

        while !self.finished && self.pos < text.len() {
            let state = self.state();
            let rest = &text[self.pos..];

            let found = table.rules(state).iter().find_map(|rule| {
                rule.pattern
                    .captures(rest)
                    .filter(|caps| caps.get(0).is_some_and(|m| m.end() > 0))
                    .map(|caps| (rule, caps))
            });

            let Some((rule, caps)) = found else {
                return self.fail(ParseError::Lexical {
                    state,
                    offset: self.pos,
                    line: line_of(text, self.pos),
                });
            };

            let offset = self.pos;
            let len = caps.get(0).map_or(0, |m| m.end());
            self.pos += len;

            match rule.transition {
                Some(Transition::Push(next)) => self.stack.push(next),
                Some(Transition::Pop) => {
                    if self.stack.len() <= 1 {
                        return self.fail(ParseError::StateUnderflow {
                            offset,
                            line: line_of(text, offset),
                        });
                    }
                    self.stack.pop();
                }
                None => {}
            }

            if let Some(action) = rule.action {
                let groups = caps
                    .iter()
                    .skip(1)
                    .map(|m| m.map(|m| m.as_str()))
                    .collect();
                log::trace!("{action} at {offset} in {state}");
                return Some(Ok(Token {
                    offset,
                    end: offset + len,
                    action,
                    groups,
                }));
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

/// Scans `text` with the built-in Verilog grammar.
pub fn tokenize(text: &str) -> Tokenizer<'_> {
    Tokenizer::new(text)
}
