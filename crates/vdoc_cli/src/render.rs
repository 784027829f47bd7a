//! Text and JSON rendering of extracted interfaces.

use std::fmt::Write;

use vdoc_parser::{VerilogModule, VerilogObject, VerilogParameter};

use crate::pipeline::FileReport;
use crate::ReportFormat;

/// Renders a set of file reports in the requested format.
pub fn render(reports: &[FileReport], format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_text(reports)),
        ReportFormat::Json => serde_json::to_string_pretty(reports),
    }
}

/// Renders reports as indented text blocks, one per module.
pub fn render_text(reports: &[FileReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(out, "{}:", report.path.display());
        if report.objects.is_empty() {
            let _ = writeln!(out, "  (no modules)");
        }
        for object in &report.objects {
            match object {
                VerilogObject::Module(module) => render_module(&mut out, module),
                VerilogObject::Parameter(param) => {
                    let _ = writeln!(out, "  {}", param_line(param));
                }
            }
        }
    }
    out
}

fn render_module(out: &mut String, module: &VerilogModule) {
    let _ = write!(out, "  module {}", module.name);
    if let Some(define) = &module.define {
        let _ = write!(out, " [{define}]");
    }
    out.push('\n');

    for line in module.description.iter().flatten() {
        let _ = writeln!(out, "    {line}");
    }

    if !module.generics.is_empty() {
        let _ = writeln!(out, "    parameters:");
        for generic in &module.generics {
            let _ = writeln!(out, "      {}", param_line(generic));
        }
    }

    if !module.ports.is_empty() || !module.sections.is_empty() {
        let _ = writeln!(out, "    ports:");
        for (index, port) in module.ports.iter().enumerate() {
            if let Some(label) = module.sections.get(&index) {
                let _ = writeln!(out, "      -- {label}");
            }
            let _ = writeln!(out, "      {}", param_line(port));
        }
        for (_, label) in module.sections.range(module.ports.len()..) {
            let _ = writeln!(out, "      -- {label}");
        }
    }
}

fn param_line(param: &VerilogParameter) -> String {
    let mut line = param.to_string();
    if let Some(define) = &param.define {
        let _ = write!(line, " [{define}]");
    }
    if let Some(desc) = &param.description {
        let _ = write!(line, "  # {}", desc.join(" "));
    }
    line
}
