//! `vdoc scan`: extract interfaces from every source in a project.
//!
//! The full pipeline:
//!
//! 1. Find project root (walk up looking for `vdoc.toml`)
//! 2. Load config via `vdoc_config`
//! 3. Discover `.v`/`.vlog` files under `[sources] dirs`
//! 4. Parse all files in parallel
//! 5. Apply the configured kind filter and render

use vdoc_parser::Declaration;

use crate::pipeline::{discover_source_files, load_project, parse_all_files};
use crate::render::render;
use crate::{GlobalArgs, ReportFormat, ScanArgs};

/// Runs the `vdoc scan` command.
///
/// Returns exit code 0 on success, including when no sources are found.
pub fn run(args: &ScanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    // Step 1-2: Find project root and load config
    let (project_dir, config) = load_project(global)?;

    if !global.quiet {
        eprintln!("   Scanning {}", config.project.name);
    }

    // Step 3: Discover source files
    let files = discover_source_files(
        &project_dir,
        &config.sources.dirs,
        &config.sources.exclude,
    )?;

    if files.is_empty() {
        if !global.quiet {
            eprintln!(
                "warning: no Verilog source files found in {}",
                config.sources.dirs.join(", ")
            );
        }
        return Ok(0);
    }

    // Step 4: Parse
    let mut reports = parse_all_files(&files)?;

    // Step 5: Filter and render
    if let Some(kind) = config.output.kind {
        for report in &mut reports {
            report.objects.retain(|obj| obj.kind() == kind);
        }
    }

    let format = args
        .format
        .unwrap_or_else(|| ReportFormat::from(config.output.format));
    let declaration_count: usize = reports.iter().map(|r| r.objects.len()).sum();

    println!("{}", render(&reports, format)?);

    if !global.quiet && format == ReportFormat::Text {
        eprintln!(
            "   Result: {} file(s), {} declaration(s)",
            reports.len(),
            declaration_count
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(config: &str, files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vdoc.toml"), config).unwrap();
        for (name, contents) in files {
            let path = dir.path().join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        }
        dir
    }

    fn global_for(dir: &tempfile::TempDir) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(dir.path().to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn scans_configured_dirs() {
        let dir = project(
            "[project]\nname = \"soc\"\n[sources]\ndirs = [\"rtl\"]\n",
            &[
                ("rtl/uart.v", "module uart(input clk); endmodule\n"),
                ("rtl/fifo.vlog", "module fifo #(parameter D = 4) (); endmodule\n"),
            ],
        );
        let args = ScanArgs {
            format: Some(ReportFormat::Json),
        };
        assert_eq!(run(&args, &global_for(&dir)).unwrap(), 0);
    }

    #[test]
    fn empty_project_succeeds() {
        let dir = project("[project]\nname = \"empty\"\n", &[]);
        let args = ScanArgs { format: None };
        assert_eq!(run(&args, &global_for(&dir)).unwrap(), 0);
    }

    #[test]
    fn parse_failure_fails_scan() {
        let dir = project(
            "[project]\nname = \"bad\"\n",
            &[("src/bad.v", "`endif\n")],
        );
        let args = ScanArgs { format: None };
        assert!(run(&args, &global_for(&dir)).is_err());
    }

    #[test]
    fn invalid_config_fails_scan() {
        let dir = project("[project]\nname = \"\"\n", &[]);
        let args = ScanArgs { format: None };
        let err = run(&args, &global_for(&dir)).unwrap_err();
        assert!(err.to_string().contains("project.name"));
    }
}
