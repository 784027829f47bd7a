//! Declarative token table for the Verilog interface scanner.
//!
//! The grammar is data: each [`LexState`] owns an ordered list of rules, and
//! every rule pairs a regular expression with an optional [`Action`] and an
//! optional stack [`Transition`]. The scanner in [`crate::lexer`] tries the
//! rules of the active state in declaration order and takes the first match,
//! so the order of the entries below is part of the grammar. Guard rules come
//! first in every state so a directive is never swallowed by a closing rule
//! or a skip rule.
//!
//! States that may contain arbitrary text (`root`, `module`, `block_comment`)
//! end with a catch-all skip rule. `parameters` and `module_port` do not, so
//! anything outside their rules is a lexical error.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// A lexer state. The scanner keeps a stack of these, starting at [`LexState::Root`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LexState {
    /// Top level of a source file, outside any module.
    Root,
    /// Inside a `module ... endmodule` body.
    Module,
    /// Inside a `parameter` list.
    Parameters,
    /// Inside a comma-separated port declaration list.
    ModulePort,
    /// Inside a `/* ... */` comment.
    BlockComment,
}

impl LexState {
    /// All states, in table order.
    pub const ALL: [LexState; 5] = [
        LexState::Root,
        LexState::Module,
        LexState::Parameters,
        LexState::ModulePort,
        LexState::BlockComment,
    ];

    /// Returns the grammar name of this state.
    pub fn name(self) -> &'static str {
        match self {
            LexState::Root => "root",
            LexState::Module => "module",
            LexState::Parameters => "parameters",
            LexState::ModulePort => "module_port",
            LexState::BlockComment => "block_comment",
        }
    }

    fn index(self) -> usize {
        match self {
            LexState::Root => 0,
            LexState::Module => 1,
            LexState::Parameters => 2,
            LexState::ModulePort => 3,
            LexState::BlockComment => 4,
        }
    }
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The action tag a rule reports to the reducer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    /// `` `ifdef NAME `` or `` `ifndef NAME ``. Groups: directive, name.
    GuardEnter,
    /// `` `endif ``. No groups.
    GuardExit,
    /// `module NAME`. Groups: name.
    ModuleStart,
    /// `endmodule`. No groups.
    ModuleEnd,
    /// Opening `/*`.
    BlockCommentStart,
    /// Closing `*/`.
    BlockCommentEnd,
    /// A `//#` documentation line. Groups: text.
    Metacomment,
    /// A `//# {{label}}` section marker. Groups: label.
    SectionMeta,
    /// `parameter [qualifier] [range]`. Groups: qualifier, range.
    ParameterStart,
    /// `NAME = value` inside a parameter list. Groups: name, value.
    ParamItem,
    /// `input|inout|output ...` declaration head. Groups: direction, remainder.
    ModulePortStart,
    /// A bare port identifier continuing the current header. Groups: name.
    PortParam,
}

impl Action {
    /// Returns the grammar tag of this action.
    pub fn tag(self) -> &'static str {
        match self {
            Action::GuardEnter => "define",
            Action::GuardExit => "endif",
            Action::ModuleStart => "module",
            Action::ModuleEnd => "end_module",
            Action::BlockCommentStart => "block_comment",
            Action::BlockCommentEnd => "end_comment",
            Action::Metacomment => "metacomment",
            Action::SectionMeta => "section_meta",
            Action::ParameterStart => "parameter_start",
            Action::ParamItem => "param_item",
            Action::ModulePortStart => "module_port_start",
            Action::PortParam => "port_param",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A change to the scanner's state stack after a rule matches.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    /// Enter the given state.
    Push(LexState),
    /// Return to the enclosing state.
    Pop,
}

/// One uncompiled grammar rule.
#[derive(Clone, Copy, Debug)]
pub struct RuleSpec {
    /// Regular expression, matched anchored at the cursor.
    pub pattern: &'static str,
    /// Action reported for a match, or `None` to consume silently.
    pub action: Option<Action>,
    /// Stack transition applied after a match.
    pub transition: Option<Transition>,
}

impl RuleSpec {
    const fn emit(pattern: &'static str, action: Action) -> Self {
        Self {
            pattern,
            action: Some(action),
            transition: None,
        }
    }

    const fn push(pattern: &'static str, action: Action, state: LexState) -> Self {
        Self {
            pattern,
            action: Some(action),
            transition: Some(Transition::Push(state)),
        }
    }

    const fn pop(pattern: &'static str, action: Option<Action>) -> Self {
        Self {
            pattern,
            action,
            transition: Some(Transition::Pop),
        }
    }

    const fn skip(pattern: &'static str) -> Self {
        Self {
            pattern,
            action: None,
            transition: None,
        }
    }
}

/// A compiled grammar rule.
#[derive(Debug)]
pub struct Rule {
    /// The pattern, compiled with a leading `^` anchor.
    pub pattern: Regex,
    /// Action reported for a match.
    pub action: Option<Action>,
    /// Stack transition applied after a match.
    pub transition: Option<Transition>,
}

/// A compiled per-state rule table.
#[derive(Debug)]
pub struct TokenTable {
    states: [Vec<Rule>; 5],
}

impl TokenTable {
    /// Compiles a table from per-state rule lists.
    ///
    /// States missing from `specs` get an empty rule list, which makes any
    /// input in that state a lexical error.
    pub fn from_specs(specs: &[(LexState, &[RuleSpec])]) -> Result<Self, regex::Error> {
        let mut states: [Vec<Rule>; 5] = Default::default();
        for (state, rules) in specs {
            let compiled = &mut states[state.index()];
            for spec in rules.iter() {
                compiled.push(Rule {
                    pattern: Regex::new(&format!("^(?:{})", spec.pattern))?,
                    action: spec.action,
                    transition: spec.transition,
                });
            }
        }
        Ok(Self { states })
    }

    /// Returns the built-in Verilog grammar.
    pub fn verilog() -> &'static TokenTable {
        &VERILOG_TABLE
    }

    /// Returns the ordered rules of a state.
    pub fn rules(&self, state: LexState) -> &[Rule] {
        &self.states[state.index()]
    }
}

// ============================================================================
// Verilog grammar
// ============================================================================

const GUARD_ENTER: &str = r"(`ifdef|`ifndef)\s+(\w+)";
const GUARD_EXIT: &str = r"`endif\b";
const BLOCK_COMMENT_START: &str = r"/\*";
const SECTION_META: &str = r"//#\s*\{\{(.*?)\}\}[^\n]*(?:\n|$)";
const METACOMMENT: &str = r"//#+([^\n]*)(?:\n|$)";
const LINE_COMMENT: &str = r"//[^\n]*(?:\n|$)";
const WHITESPACE: &str = r"\s+";
/// Whole words, whitespace runs, or a single other character.
const SKIP_ANY: &str = r"(?s)\w+|\s+|.";

const PARAMETER_HEAD: &str =
    r"parameter\b\s*(?:(signed|integer|realtime|real|time)\b)?\s*(\[[^\]]+\])?";
/// Direction keyword plus the rest of the declaration head. A keyword alone
/// on its line takes its head from the next line, unless that line starts a
/// directive; with nothing usable the head is empty.
const PORT_HEAD: &str =
    r"(input|inout|output)\b([ \t]*[a-zA-Z0-9`:\[\]_-][a-zA-Z0-9`: \t\[\]_-]*|[ \t]*(?:\n\s*[a-zA-Z0-9:\[\]_-][a-zA-Z0-9`: \t\[\]_-]*)?)";

const ROOT_RULES: &[RuleSpec] = &[
    RuleSpec::emit(GUARD_ENTER, Action::GuardEnter),
    RuleSpec::emit(GUARD_EXIT, Action::GuardExit),
    RuleSpec::push(r"module\s+(\w+)\s*", Action::ModuleStart, LexState::Module),
    RuleSpec::push(
        BLOCK_COMMENT_START,
        Action::BlockCommentStart,
        LexState::BlockComment,
    ),
    RuleSpec::emit(METACOMMENT, Action::Metacomment),
    RuleSpec::skip(LINE_COMMENT),
    RuleSpec::skip(SKIP_ANY),
];

const MODULE_RULES: &[RuleSpec] = &[
    RuleSpec::emit(GUARD_ENTER, Action::GuardEnter),
    RuleSpec::emit(GUARD_EXIT, Action::GuardExit),
    RuleSpec::skip(r#""(?:[^"\\\n]|\\.)*""#),
    RuleSpec::skip(r"(?s)function\b.*?\bendfunction\b"),
    RuleSpec::skip(r"(?s)task\b.*?\bendtask\b"),
    RuleSpec::push(PARAMETER_HEAD, Action::ParameterStart, LexState::Parameters),
    RuleSpec::push(PORT_HEAD, Action::ModulePortStart, LexState::ModulePort),
    RuleSpec::pop(r"endmodule\b", Some(Action::ModuleEnd)),
    RuleSpec::push(
        BLOCK_COMMENT_START,
        Action::BlockCommentStart,
        LexState::BlockComment,
    ),
    RuleSpec::emit(SECTION_META, Action::SectionMeta),
    RuleSpec::emit(METACOMMENT, Action::Metacomment),
    RuleSpec::skip(LINE_COMMENT),
    RuleSpec::skip(SKIP_ANY),
];

const PARAMETER_RULES: &[RuleSpec] = &[
    RuleSpec::emit(GUARD_ENTER, Action::GuardEnter),
    RuleSpec::emit(GUARD_EXIT, Action::GuardExit),
    RuleSpec::emit(
        r"\s*parameter\b\s*(?:(signed|integer|realtime|real|time)\b)?\s*(\[[^\]]+\])?",
        Action::ParameterStart,
    ),
    RuleSpec::emit(
        r#"\s*(\w+)\s*=\s*("[^"\n]*"|[^,;()/\s]+(?:[ \t]+[^,;()/\s]+)*)\s*"#,
        Action::ParamItem,
    ),
    RuleSpec::skip(r"\s*,"),
    RuleSpec::pop(r"\s*[);]", None),
    RuleSpec::push(
        BLOCK_COMMENT_START,
        Action::BlockCommentStart,
        LexState::BlockComment,
    ),
    RuleSpec::emit(METACOMMENT, Action::Metacomment),
    RuleSpec::skip(LINE_COMMENT),
    RuleSpec::skip(WHITESPACE),
];

const MODULE_PORT_RULES: &[RuleSpec] = &[
    RuleSpec::emit(GUARD_ENTER, Action::GuardEnter),
    RuleSpec::emit(GUARD_EXIT, Action::GuardExit),
    RuleSpec::emit(
        r"\s*(input|inout|output)\b([ \t]*[a-zA-Z0-9`:\[\]_-][a-zA-Z0-9`: \t\[\]_-]*|[ \t]*(?:\n\s*[a-zA-Z0-9:\[\]_-][a-zA-Z0-9`: \t\[\]_-]*)?)\s*,?",
        Action::ModulePortStart,
    ),
    RuleSpec::emit(r"\s*(\w+)\s*,?", Action::PortParam),
    RuleSpec::skip(r"\s*,"),
    RuleSpec::pop(r"\s*[);]", None),
    RuleSpec::push(
        BLOCK_COMMENT_START,
        Action::BlockCommentStart,
        LexState::BlockComment,
    ),
    RuleSpec::emit(SECTION_META, Action::SectionMeta),
    RuleSpec::emit(METACOMMENT, Action::Metacomment),
    RuleSpec::skip(LINE_COMMENT),
    RuleSpec::skip(WHITESPACE),
];

const BLOCK_COMMENT_RULES: &[RuleSpec] = &[
    RuleSpec::pop(r"\*/", Some(Action::BlockCommentEnd)),
    RuleSpec::skip(r"(?s)[^*]+|."),
];

/// The Verilog grammar as uncompiled rule lists.
pub const VERILOG_RULES: &[(LexState, &[RuleSpec])] = &[
    (LexState::Root, ROOT_RULES),
    (LexState::Module, MODULE_RULES),
    (LexState::Parameters, PARAMETER_RULES),
    (LexState::ModulePort, MODULE_PORT_RULES),
    (LexState::BlockComment, BLOCK_COMMENT_RULES),
];

static VERILOG_TABLE: Lazy<TokenTable> =
    Lazy::new(|| TokenTable::from_specs(VERILOG_RULES).unwrap());
