//! vync - Command-line driver for the Vyn compiler front-end.
//!
//! Runs the lex -> parse -> analyze pipeline over the given files and
//! prints diagnostics as `{file}:{line}:{column}: {message}` lines on
//! stderr. Exit code is 0 when every file compiles cleanly and 1 when
//! any stage produces a fatal error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*};

use vync_drv::{Config, Session};

/// Vyn compiler front-end
#[derive(Parser, Debug)]
#[command(name = "vync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lex, parse and analyze Vyn source files", long_about = None)]
struct Cli {
    /// Source files to compile
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Stop after parsing; skip semantic analysis
    #[arg(long)]
    parse_only: bool,

    /// Report only semantic diagnostics
    #[arg(long)]
    semantic_only: bool,

    /// Print the token stream and exit
    #[arg(long)]
    emit_tokens: bool,

    /// Trace the lexer (sets the vync_lex debug target)
    #[arg(long, env = "VYNC_TRACE_LEXER")]
    trace_lexer: bool,

    /// Trace the parser (sets the vync_par debug target)
    #[arg(long, env = "VYNC_TRACE_PARSER")]
    trace_parser: bool,

    /// Suppress non-fatal diagnostic output
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(config.trace_filter())
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config {
        inputs: cli.inputs.clone(),
        parse_only: cli.parse_only,
        semantic_only: cli.semantic_only,
        emit_tokens: cli.emit_tokens,
        trace_lexer: cli.trace_lexer,
        trace_parser: cli.trace_parser,
        quiet: cli.quiet,
    };
    init_tracing(&config);

    let session = Session::new(config);

    let reports = match session.run() {
        Ok(reports) => reports,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for report in &reports {
        if let Some(tokens) = &report.tokens {
            for token in tokens {
                println!("{token}");
            }
            continue;
        }
        if let Some(error) = &report.parse_error {
            eprintln!("error: {error}");
            failed = true;
            continue;
        }
        for diagnostic in &report.diagnostics {
            if !cli.quiet {
                eprintln!("{diagnostic}");
            }
        }
        if report.has_errors() {
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
