//! vync-drv - Compiler driver for the Vyn front-end.
//!
//! The driver threads one source file through the pipeline
//!
//! ```text
//! text -> Lexer -> tokens -> Parser -> AST -> SemanticAnalyzer -> diagnostics
//! ```
//!
//! and accumulates diagnostics across stages. Each stage is a pure
//! function over its input; there is no feedback loop. A fatal lexical or
//! syntactic error ends that file's pipeline; semantic diagnostics are
//! collected without aborting.
//!
//! Multiple input files run as independent pipelines in parallel; they
//! share no state, and reports come back in input order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use vync_lex::{Lexer, Token};
use vync_par::{parse, Module};
use vync_sem::analyze;
use vync_util::{Diagnostic, ParseError};

/// Driver configuration, usually built from the command line.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Input source files.
    pub inputs: Vec<PathBuf>,
    /// Stop after parsing; skip semantic analysis.
    pub parse_only: bool,
    /// Report only semantic diagnostics: the report carries neither
    /// tokens nor AST, just the analyzer's output. Parse errors are
    /// still fatal.
    pub semantic_only: bool,
    /// Dump the token stream instead of compiling.
    pub emit_tokens: bool,
    /// Enable lexer stage tracing (`vync_lex` debug events).
    pub trace_lexer: bool,
    /// Enable parser stage tracing (`vync_par` debug events).
    pub trace_parser: bool,
    /// Suppress non-fatal diagnostic output.
    pub quiet: bool,
}

impl Config {
    /// Builds the tracing filter for this configuration: the environment
    /// filter (default `warn`) plus the per-stage debug targets selected
    /// by the trace flags.
    ///
    /// The `vync` binary installs this on its subscriber; programmatic
    /// callers driving [`Session`] directly can do the same before
    /// running a pipeline.
    pub fn trace_filter(&self) -> EnvFilter {
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        if self.trace_lexer {
            filter = filter.add_directive("vync_lex=debug".parse().expect("static directive"));
        }
        if self.trace_parser {
            filter = filter
                .add_directive("vync_par=debug".parse().expect("static directive"))
                .add_directive("vync_drv=debug".parse().expect("static directive"));
        }
        filter
    }
}

/// The outcome of one file's pipeline.
#[derive(Debug)]
pub struct FileReport {
    /// The input path.
    pub path: PathBuf,
    /// Tokens, kept only under `emit_tokens`.
    pub tokens: Option<Vec<Token>>,
    /// The parsed module, absent on fatal errors and under
    /// `semantic_only`.
    pub module: Option<Module>,
    /// The fatal parse error, if any.
    pub parse_error: Option<ParseError>,
    /// Semantic diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    /// True when this file failed fatally or produced error diagnostics.
    pub fn has_errors(&self) -> bool {
        self.parse_error.is_some()
            || self
                .diagnostics
                .iter()
                .any(|d| d.level == vync_util::Level::Error)
    }
}

/// One driver invocation: a configuration plus its reports.
pub struct Session {
    /// The configuration this session runs under.
    pub config: Config,
}

impl Session {
    /// Creates a session.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the pipeline over every input file.
    ///
    /// Files are processed in parallel; each pipeline owns its lexer,
    /// parser and analyzer, so nothing is shared. Reports keep the
    /// input order.
    pub fn run(&self) -> anyhow::Result<Vec<FileReport>> {
        self.config
            .inputs
            .par_iter()
            .map(|path| {
                let source = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("could not read {}: {e}", path.display())
                })?;
                Ok(self.run_pipeline(path, &source))
            })
            .collect()
    }

    /// Runs the pipeline over one source text.
    pub fn run_pipeline(&self, path: &Path, source: &str) -> FileReport {
        let file_name = path.display().to_string();
        let _span = tracing::debug_span!("pipeline", file = %file_name).entered();

        tracing::debug!("lexing");
        let tokens = Lexer::new(source, file_name.as_str()).tokenize();

        if self.config.emit_tokens {
            return FileReport {
                path: path.to_path_buf(),
                tokens: Some(tokens),
                module: None,
                parse_error: None,
                diagnostics: Vec::new(),
            };
        }

        tracing::debug!(count = tokens.len(), "parsing");
        let module = match parse(tokens, &file_name) {
            Ok(module) => module,
            Err(error) => {
                tracing::debug!(%error, "parse failed");
                return FileReport {
                    path: path.to_path_buf(),
                    tokens: None,
                    module: None,
                    parse_error: Some(error),
                    diagnostics: Vec::new(),
                };
            }
        };

        let diagnostics = if self.config.parse_only {
            Vec::new()
        } else {
            tracing::debug!("analyzing");
            analyze(&module)
        };

        // Under semantic_only the diagnostics are the whole report.
        let module = if self.config.semantic_only {
            None
        } else {
            Some(module)
        };

        FileReport {
            path: path.to_path_buf(),
            tokens: None,
            module,
            parse_error: None,
            diagnostics,
        }
    }
}

/// Convenience wrapper: full pipeline over an in-memory source.
///
/// Returns the module and its semantic diagnostics, or the fatal parse
/// error.
pub fn compile_source(source: &str, file_name: &str) -> Result<(Module, Vec<Diagnostic>), ParseError> {
    let tokens = Lexer::new(source, file_name).tokenize();
    let module = parse(tokens, file_name)?;
    let diagnostics = analyze(&module);
    Ok((module, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_source_clean() {
        let (module, diags) =
            compile_source("fn main() -> Int { var x: Int = 55; return x; }", "t.vyn").unwrap();
        assert_eq!(module.body.len(), 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_compile_source_semantic_diagnostics() {
        let (_, diags) = compile_source("fn f() { x = at(p); }", "t.vyn").unwrap();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].to_string().contains("unsafe"));
    }

    #[test]
    fn test_compile_source_parse_error() {
        let err = compile_source("fn main( {", "t.vyn").unwrap_err();
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn test_pipeline_parse_only_skips_analysis() {
        let session = Session::new(Config { parse_only: true, ..Config::default() });
        let report = session.run_pipeline(Path::new("t.vyn"), "fn f() { x = at(p); }");
        assert!(report.module.is_some());
        assert!(report.diagnostics.is_empty());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_pipeline_emit_tokens() {
        let session = Session::new(Config { emit_tokens: true, ..Config::default() });
        let report = session.run_pipeline(Path::new("t.vyn"), "let x = 1");
        let tokens = report.tokens.expect("tokens requested");
        assert!(!tokens.is_empty());
        assert!(report.module.is_none());
    }

    #[test]
    fn test_pipeline_reports_fatal_error() {
        let session = Session::new(Config::default());
        let report = session.run_pipeline(Path::new("t.vyn"), "fn main( {");
        assert!(report.parse_error.is_some());
        assert!(report.module.is_none());
        assert!(report.has_errors());
    }

    #[test]
    fn test_semantic_only_reports_diagnostics_without_ast() {
        let session = Session::new(Config { semantic_only: true, ..Config::default() });
        let report = session.run_pipeline(Path::new("t.vyn"), "fn f() { x = at(p); }");
        assert!(report.tokens.is_none());
        assert!(report.module.is_none());
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn test_semantic_only_clean_file_has_empty_report() {
        let session = Session::new(Config { semantic_only: true, ..Config::default() });
        let report = session.run_pipeline(Path::new("t.vyn"), "fn ok() -> Int { return 1; }");
        assert!(report.module.is_none());
        assert!(report.diagnostics.is_empty());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_semantic_only_keeps_parse_errors_fatal() {
        let session = Session::new(Config { semantic_only: true, ..Config::default() });
        let report = session.run_pipeline(Path::new("t.vyn"), "fn main( {");
        assert!(report.parse_error.is_some());
        assert!(report.has_errors());
    }

    #[test]
    fn test_trace_filter_directives() {
        let traced = Config {
            trace_lexer: true,
            trace_parser: true,
            ..Config::default()
        };
        let filter = traced.trace_filter().to_string();
        assert!(filter.contains("vync_lex=debug"), "missing lexer target: {filter}");
        assert!(filter.contains("vync_par=debug"), "missing parser target: {filter}");

        let plain = Config::default().trace_filter().to_string();
        assert!(!plain.contains("vync_lex=debug"));
        assert!(!plain.contains("vync_par=debug"));
    }
}
