//! Semantic reducer: folds the token stream into module records.
//!
//! The [`Reducer`] keeps the in-progress module (name, keyed ports, generics,
//! sections), the port header that bare identifiers inherit, the stack of open
//! conditional guards, and a single "last completed item" slot that trailing
//! `//#` comments attach to. Modules are emitted only at `endmodule`.

use std::collections::BTreeMap;
use std::mem;

use indexmap::IndexMap;

use crate::ast::{PortMode, VerilogModule, VerilogParameter};
use crate::decl::{parameter_type, PortHeader};
use crate::error::{line_of, ParseError};
use crate::lexer::{Token, Tokenizer};
use crate::token::Action;

/// Parses a complete source text into module records.
///
/// Modules are returned in the order their `endmodule` was reached. Any
/// failure discards the whole result.
pub fn parse(text: &str) -> Result<Vec<VerilogModule>, ParseError> {
    let mut reducer = Reducer::new(text);
    for token in Tokenizer::new(text) {
        reducer.apply(&token?)?;
    }
    reducer.finish()
}

/// The declaration that a trailing metacomment describes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LastItem {
    /// Index into the generics list.
    Generic(usize),
    /// Index into the pending bare-port buffer.
    Pending(usize),
    /// Key of a finalized port.
    Port(String),
}

/// A port identifier waiting for its header to be finalized.
#[derive(Debug, Clone)]
struct PendingPort {
    name: String,
    define: Option<String>,
    description: Option<Vec<String>>,
}

/// Parser context for one pass over a source text.
pub struct Reducer<'a> {
    text: &'a str,

    module_name: Option<String>,
    module_define: Option<String>,

    ports: IndexMap<String, VerilogParameter>,
    pending: Vec<PendingPort>,
    generics: Vec<VerilogParameter>,
    sections: Vec<(usize, String)>,
    port_count: usize,
    metacomments: Vec<String>,

    param_type: String,
    port_mode: PortMode,
    port_type: String,

    defines: Vec<String>,
    last_item: Option<LastItem>,

    modules: Vec<VerilogModule>,
}

impl<'a> Reducer<'a> {
    /// Creates a reducer for tokens scanned from `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            module_name: None,
            module_define: None,
            ports: IndexMap::new(),
            pending: Vec::new(),
            generics: Vec::new(),
            sections: Vec::new(),
            port_count: 0,
            metacomments: Vec::new(),
            param_type: String::new(),
            port_mode: PortMode::Input,
            port_type: String::new(),
            defines: Vec::new(),
            last_item: None,
            modules: Vec::new(),
        }
    }

    /// Applies one token.
    pub fn apply(&mut self, token: &Token<'_>) -> Result<(), ParseError> {
        match token.action {
            Action::Metacomment => {
                let text = token.group(0).unwrap_or_default().trim().to_string();
                self.attach_comment(text);
            }
            Action::SectionMeta => {
                let label = token.group(0).unwrap_or_default().trim().to_string();
                self.sections.push((self.port_count, label));
            }
            Action::GuardEnter => {
                let directive = token.group(0).unwrap_or_default();
                let name = token.group(1).unwrap_or_default();
                self.defines.push(format!("{directive}={name}"));
            }
            Action::GuardExit => {
                if self.defines.pop().is_none() {
                    return Err(ParseError::UnmatchedEndif {
                        line: self.line(token),
                    });
                }
            }
            Action::ModuleStart => {
                self.start_module(token.group(0).unwrap_or_default());
            }
            Action::ParameterStart => {
                self.param_type = parameter_type(token.group(0), token.group(1));
            }
            Action::ParamItem => {
                let name = token.group(0).unwrap_or_default();
                let value = token.group(1).unwrap_or_default();
                self.generics.push(VerilogParameter::generic(
                    name,
                    self.param_type.clone(),
                    value,
                    self.innermost_define(),
                ));
                self.last_item = Some(LastItem::Generic(self.generics.len() - 1));
            }
            Action::ModulePortStart => self.port_header(token)?,
            Action::PortParam => {
                let name = token.group(0).unwrap_or_default();
                self.push_pending(name);
            }
            Action::ModuleEnd => self.end_module(token)?,
            Action::BlockCommentStart | Action::BlockCommentEnd => {}
        }
        Ok(())
    }

    /// Checks end-of-input invariants and returns the finished modules.
    pub fn finish(self) -> Result<Vec<VerilogModule>, ParseError> {
        if let Some(guard) = self.defines.last() {
            return Err(ParseError::UnterminatedGuard {
                guard: guard.clone(),
                line: line_of(self.text, self.text.len()),
            });
        }
        if let Some(name) = &self.module_name {
            log::debug!("module `{name}` has no `endmodule`; dropped");
        }
        Ok(self.modules)
    }

    fn line(&self, token: &Token<'_>) -> usize {
        line_of(self.text, token.offset)
    }

    fn innermost_define(&self) -> Option<String> {
        self.defines.last().cloned()
    }

    /// Attaches a `//#` line to the last completed item, or queues it as
    /// module documentation when nothing has been declared yet.
    fn attach_comment(&mut self, text: String) {
        let slot = match &self.last_item {
            None => {
                self.metacomments.push(text);
                return;
            }
            Some(LastItem::Generic(index)) => {
                self.generics.get_mut(*index).map(|g| &mut g.description)
            }
            Some(LastItem::Pending(index)) => {
                self.pending.get_mut(*index).map(|p| &mut p.description)
            }
            Some(LastItem::Port(name)) => self.ports.get_mut(name).map(|p| &mut p.description),
        };
        if let Some(slot) = slot {
            *slot = Some(vec![text]);
        }
    }

    fn start_module(&mut self, name: &str) {
        self.module_name = Some(name.to_string());
        self.module_define = self.innermost_define();
        self.ports.clear();
        self.pending.clear();
        self.generics.clear();
        self.sections.clear();
        self.port_count = 0;
        self.param_type.clear();
        self.port_mode = PortMode::Input;
        self.port_type.clear();
        self.last_item = None;
    }

    fn port_header(&mut self, token: &Token<'_>) -> Result<(), ParseError> {
        let keyword = token.group(0).unwrap_or_default();
        let remainder = token.group(1).unwrap_or_default();

        self.flush_pending();

        let header = PortHeader::parse(remainder).ok_or_else(|| ParseError::UnknownPortFormat {
            mode: keyword.to_string(),
            header: remainder.trim().to_string(),
            line: self.line(token),
        })?;

        self.port_mode = PortMode::from_keyword(keyword).unwrap_or(PortMode::Input);
        self.port_type = header.data_type();
        if let Some(ident) = &header.ident {
            self.push_pending(ident);
        }
        Ok(())
    }

    fn push_pending(&mut self, name: &str) {
        self.pending.push(PendingPort {
            name: name.to_string(),
            define: self.innermost_define(),
            description: None,
        });
        self.port_count += 1;
        self.last_item = Some(LastItem::Pending(self.pending.len() - 1));
    }

    /// Finalizes buffered identifiers with the active mode and type.
    fn flush_pending(&mut self) {
        if let Some(LastItem::Pending(index)) = self.last_item {
            self.last_item = self
                .pending
                .get(index)
                .map(|p| LastItem::Port(p.name.clone()));
        }
        for pending in mem::take(&mut self.pending) {
            let port = VerilogParameter {
                name: pending.name.clone(),
                mode: Some(self.port_mode),
                data_type: self.port_type.clone(),
                default_value: None,
                description: pending.description,
                define: pending.define,
            };
            self.ports.shift_remove(&pending.name);
            self.ports.insert(pending.name, port);
        }
    }

    fn end_module(&mut self, token: &Token<'_>) -> Result<(), ParseError> {
        self.flush_pending();

        if let Some(guard) = self.defines.last() {
            return Err(ParseError::UnterminatedGuard {
                guard: guard.clone(),
                line: self.line(token),
            });
        }

        let mut ports: Vec<VerilogParameter> = self.ports.drain(..).map(|(_, p)| p).collect();
        ports.sort_by(|a, b| a.name.cmp(&b.name));

        let sections: BTreeMap<usize, String> = mem::take(&mut self.sections).into_iter().collect();
        let metacomments = mem::take(&mut self.metacomments);

        let module = VerilogModule {
            name: self.module_name.take().unwrap_or_default(),
            ports,
            generics: mem::take(&mut self.generics),
            sections,
            description: (!metacomments.is_empty()).then_some(metacomments),
            define: self.module_define.take(),
        };
        log::debug!(
            "module `{}`: {} port(s), {} parameter(s)",
            module.name,
            module.ports.len(),
            module.generics.len()
        );
        self.modules.push(module);
        self.last_item = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Declaration;

    fn parse_ok(text: &str) -> Vec<VerilogModule> {
        parse(text).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn single(text: &str) -> VerilogModule {
        let mut modules = parse_ok(text);
        assert_eq!(modules.len(), 1, "expected one module");
        modules.remove(0)
    }

    fn port_summary(module: &VerilogModule) -> Vec<(&str, PortMode, &str)> {
        module
            .ports
            .iter()
            .map(|p| (p.name.as_str(), p.mode.unwrap(), p.data_type.as_str()))
            .collect()
    }

    #[test]
    fn ansi_ports_sorted_with_types() {
        let m = single("module foo ( input a, input [7:0] b, output reg [3:0] c ); endmodule");
        assert_eq!(m.name, "foo");
        assert_eq!(
            port_summary(&m),
            vec![
                ("a", PortMode::Input, ""),
                ("b", PortMode::Input, "[7:0]"),
                ("c", PortMode::Output, "reg [3:0]"),
            ]
        );
    }

    #[test]
    fn body_parameter_becomes_generic() {
        let m = single("module m; parameter WIDTH = 8; endmodule");
        assert!(m.ports.is_empty());
        assert_eq!(
            m.generics,
            vec![VerilogParameter::generic("WIDTH", "", "8", None)]
        );
    }

    #[test]
    fn unclosed_guard_in_module_fails() {
        let err = parse("module m;\n`ifdef FOO\nendmodule\n").unwrap_err();
        match err {
            ParseError::UnterminatedGuard { guard, line } => {
                assert_eq!(guard, "`ifdef=FOO");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stray_endif_fails() {
        let err = parse("`endif\nmodule m; endmodule").unwrap_err();
        assert!(matches!(err, ParseError::UnmatchedEndif { line: 1 }));
    }

    #[test]
    fn packed_range_and_array() {
        let m = single("module m ( input [7:0][3:0] d ); endmodule");
        assert_eq!(port_summary(&m), vec![("d", PortMode::Input, "[7:0][3:0]")]);
    }

    #[test]
    fn bare_identifiers_inherit_header() {
        let m = single("module m(input wire [3:0] x, y, output z); endmodule");
        assert_eq!(
            port_summary(&m),
            vec![
                ("x", PortMode::Input, "wire [3:0]"),
                ("y", PortMode::Input, "wire [3:0]"),
                ("z", PortMode::Output, ""),
            ]
        );
    }

    #[test]
    fn redeclared_port_uses_later_header() {
        let m = single("module m(input a, output [1:0] a); endmodule");
        assert_eq!(port_summary(&m), vec![("a", PortMode::Output, "[1:0]")]);
    }

    #[test]
    fn generics_keep_source_order() {
        let m = single(
            "module m #(parameter Z = 1, parameter integer A = 2, M = 3) (input clk); endmodule",
        );
        let names: Vec<_> = m.generics.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
        assert_eq!(m.generics[0].data_type, "");
        assert_eq!(m.generics[1].data_type, "integer");
        assert_eq!(m.generics[2].data_type, "integer");
        assert!(m.generics.iter().all(|g| g.mode == Some(PortMode::In)));
    }

    #[test]
    fn parameter_range_type() {
        let m = single("module m #(parameter signed [7:0] OFFSET = 3) (); endmodule");
        assert_eq!(m.generics[0].data_type, "signed [7:0]");
        assert_eq!(m.generics[0].default_value.as_deref(), Some("3"));
    }

    #[test]
    fn module_description_from_leading_metacomments() {
        let m = single("//# UART transmitter\n//# 8N1 only\nmodule tx(input clk); endmodule\n");
        assert_eq!(
            m.description(),
            Some(&["UART transmitter".to_string(), "8N1 only".to_string()][..])
        );
    }

    #[test]
    fn trailing_metacomment_describes_port() {
        let m = single(
            "module m(\n  input clk, //# System clock\n  input rst, //# Active high\n  output q\n);\nendmodule\n",
        );
        assert_eq!(
            m.port("clk").unwrap().description,
            Some(vec!["System clock".to_string()])
        );
        assert_eq!(
            m.port("rst").unwrap().description,
            Some(vec!["Active high".to_string()])
        );
        assert_eq!(m.port("q").unwrap().description, None);
        assert_eq!(m.description, None);
    }

    #[test]
    fn trailing_metacomment_describes_generic() {
        let m = single("module m #(\n  parameter DEPTH = 16 //# FIFO depth\n) (); endmodule");
        assert_eq!(
            m.generics[0].description,
            Some(vec!["FIFO depth".to_string()])
        );
    }

    #[test]
    fn later_metacomment_overwrites() {
        let m = single("module m(input a //# first\n//# second\n); endmodule");
        assert_eq!(
            m.port("a").unwrap().description,
            Some(vec!["second".to_string()])
        );
    }

    #[test]
    fn comment_after_flushed_port_still_attaches() {
        let m = single("module m(input a, b\n, output c); endmodule");
        assert_eq!(m.ports.len(), 3);
        let m = single("module m(input b //# bee\n, output c //# sea\n); endmodule");
        assert_eq!(m.port("b").unwrap().description, Some(vec!["bee".to_string()]));
        assert_eq!(m.port("c").unwrap().description, Some(vec!["sea".to_string()]));
    }

    #[test]
    fn sections_record_port_count() {
        let m = single(
            "module m(\n//# {{Clocks}}\n input clk,\n//# {{Data}}\n input [7:0] d,\n output [7:0] q\n); endmodule",
        );
        let sections: Vec<_> = m.sections.iter().map(|(k, v)| (*k, v.as_str())).collect();
        assert_eq!(sections, vec![(0, "Clocks"), (1, "Data")]);
    }

    #[test]
    fn guards_annotate_declarations() {
        let m = single(
            "module m(\n input a,\n`ifdef DEBUG\n output dbg,\n`ifndef SLIM\n output trace,\n`endif\n`endif\n output b\n); endmodule",
        );
        assert_eq!(m.port("a").unwrap().define, None);
        assert_eq!(m.port("dbg").unwrap().define.as_deref(), Some("`ifdef=DEBUG"));
        assert_eq!(
            m.port("trace").unwrap().define.as_deref(),
            Some("`ifndef=SLIM")
        );
        assert_eq!(m.port("b").unwrap().define, None);
    }

    #[test]
    fn guard_around_module_fails_at_endmodule() {
        let err = parse("`ifdef FPGA\nmodule pll(input clk); endmodule\n`endif\n").unwrap_err();
        match err {
            ParseError::UnterminatedGuard { guard, line } => {
                assert_eq!(guard, "`ifdef=FPGA");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unclosed_guard_at_end_of_input_fails() {
        let err = parse("`ifndef SIM\nmodule m; endmodule\n").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedGuard { .. }));
    }

    #[test]
    fn endif_inside_module_closes_enclosing_guard() {
        let modules = parse_ok("`ifdef A\nmodule m;\n`endif\nendmodule\n");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "m");
        assert_eq!(modules[0].define.as_deref(), Some("`ifdef=A"));
    }

    #[test]
    fn guard_closed_before_module_is_balanced() {
        let modules = parse_ok("`ifdef FPGA\n`define HAS_PLL\n`endif\nmodule pll(input clk); endmodule\n");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].define, None);
    }

    #[test]
    fn direction_alone_on_its_line() {
        let m = single("module m(\n  input\n  clk,\n  output q\n); endmodule\n");
        assert_eq!(
            port_summary(&m),
            vec![("clk", PortMode::Input, ""), ("q", PortMode::Output, "")]
        );
    }

    #[test]
    fn direction_alone_before_typed_head() {
        let m = single("module m;\n  output\n    reg [3:0] cnt;\nendmodule\n");
        assert_eq!(port_summary(&m), vec![("cnt", PortMode::Output, "reg [3:0]")]);
    }

    #[test]
    fn direction_alone_before_guard() {
        let m = single("module m(\n  input\n`ifdef EXT\n  ext_clk,\n`endif\n  rst\n); endmodule\n");
        assert_eq!(
            m.port("ext_clk").unwrap().define.as_deref(),
            Some("`ifdef=EXT")
        );
        assert_eq!(m.port("rst").unwrap().mode, Some(PortMode::Input));
    }

    #[test]
    fn unclosed_module_yields_nothing() {
        assert!(parse_ok("module m(input a);\n").is_empty());
    }

    #[test]
    fn too_many_brackets_fails() {
        let err = parse("module m(input [1:0][1:0][1:0] x); endmodule").unwrap_err();
        assert!(matches!(err, ParseError::UnknownPortFormat { .. }));
    }

    #[test]
    fn failure_discards_earlier_modules() {
        assert!(parse("module ok(input a); endmodule\n`endif\n").is_err());
    }

    #[test]
    fn multiple_modules_in_order() {
        let modules = parse_ok("module b; endmodule\nmodule a; endmodule\n");
        let names: Vec<_> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn comments_reset_between_modules() {
        let modules = parse_ok(
            "//# first\nmodule a(input x //# ex\n); endmodule\n//# second\nmodule b; endmodule\n",
        );
        assert_eq!(modules[0].description, Some(vec!["first".to_string()]));
        assert_eq!(modules[1].description, Some(vec!["second".to_string()]));
    }

    #[test]
    fn non_ansi_body_declarations() {
        let m = single(
            "module m(a, b, y);\n  input a, b;\n  output reg y;\n  always @(*) y = a & b;\nendmodule\n",
        );
        assert_eq!(
            port_summary(&m),
            vec![
                ("a", PortMode::Input, ""),
                ("b", PortMode::Input, ""),
                ("y", PortMode::Output, "reg"),
            ]
        );
    }

    #[test]
    fn deterministic() {
        let src = "//# doc\nmodule m #(parameter W = 4) (input [W-1:0] a, output b); endmodule";
        assert_eq!(parse_ok(src), parse_ok(src));
    }
}
