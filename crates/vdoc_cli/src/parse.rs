//! `vdoc parse`: extract interfaces from explicit files.
//!
//! Every file goes through one [`VerilogExtractor`], so a path given twice is
//! read and parsed once. Files without a Verilog extension are skipped with
//! a warning.

use std::path::PathBuf;

use vdoc_extract::{is_verilog, VerilogExtractor};

use crate::pipeline::FileReport;
use crate::render::render;
use crate::{GlobalArgs, ParseArgs, ReportFormat};

/// Runs the `vdoc parse` command.
///
/// Returns exit code 0 on success. Any read or parse failure aborts the
/// command with an error.
pub fn run(args: &ParseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let format = args.format.unwrap_or(ReportFormat::Text);
    let kind = args.kind.map(Into::into);

    let mut extractor = VerilogExtractor::new();
    let mut reports = Vec::new();

    for file in &args.files {
        let path = PathBuf::from(file);
        if !is_verilog(&path) {
            if !global.quiet {
                eprintln!("warning: skipping {} (not a Verilog source)", path.display());
            }
            continue;
        }
        if !global.quiet {
            eprintln!("   Parsing {}", path.display());
        }
        let objects = extractor.extract_objects(&path, kind)?;
        reports.push(FileReport { path, objects });
    }

    log::debug!("{} file(s) cached", extractor.len());
    println!("{}", render(&reports, format)?);
    Ok(0)
}
