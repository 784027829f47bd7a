//! vdoc CLI: interface documentation extraction for Verilog sources.
//!
//! Provides `vdoc parse` for extracting module interfaces from explicit files
//! and `vdoc scan` for extracting every module under a configured project.

#![warn(missing_docs)]

mod parse;
mod pipeline;
mod render;
mod scan;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use vdoc_config::OutputFormat;
use vdoc_parser::ObjectKind;

/// vdoc: Verilog interface extraction.
#[derive(Parser, Debug)]
#[command(name = "vdoc", version, about = "Verilog interface extraction")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `vdoc.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract module interfaces from the given files.
    Parse(ParseArgs),
    /// Extract module interfaces from every source in the project.
    Scan(ScanArgs),
}

/// Arguments for the `vdoc parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Verilog source files (`.v`, `.vlog`).
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Only report declarations of this kind.
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,
}

/// Arguments for the `vdoc scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Output format; overrides `[output] format` in `vdoc.toml`.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// Declaration kind filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Modules.
    Module,
    /// Parameters and ports.
    Parameter,
}

impl From<KindArg> for ObjectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Module => ObjectKind::Module,
            KindArg::Parameter => ObjectKind::Parameter,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// The default log level implied by `--quiet` and `--verbose`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    // RUST_LOG, when set, overrides the flag-derived level.
    let _ = env_logger::builder()
        .filter_level(global.log_level())
        .parse_default_env()
        .try_init();

    let result = match cli.command {
        Command::Parse(ref args) => parse::run(args, &global),
        Command::Scan(ref args) => scan::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
