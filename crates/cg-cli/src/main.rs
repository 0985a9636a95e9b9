//! CLI entry point for the cg-autoimport tool.
//!
//! This binary exposes the import advisor from the command line: it indexes
//! the workspace's generated `typings/*_modules.*.d.ts` files and answers
//! completion, import and quick-fix queries as JSON or plain text.
//!
//! # Usage
//!
//! ```bash
//! cg-autoimport [OPTIONS] <COMMAND>
//!
//! # List every known symbol
//! cg-autoimport symbols --root /path/to/workspace
//!
//! # Completion proposals for a prefix, with import edits for a document
//! cg-autoimport complete Wid --document src/app.ts
//!
//! # Quick fix for an unresolved identifier on line 12, characters 8..14
//! cg-autoimport fix --document src/app.ts --line 12 --start 8 --end 14
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cg_catalog::{
    resolve_import_insertion_point, Diagnostic, FsDeclarationSource, ImportAdvisor,
    RefreshUpdate, StatsSnapshot,
};
use cg_core::{Config, TextRange};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, WrapErr};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Completion and auto-import helper for ambient `CG.*` declaration files.
#[derive(Parser)]
#[command(name = "cg-autoimport", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Workspace root containing the `typings` directory.
    #[arg(short, long, global = true, env = "CG_AUTOIMPORT_ROOT")]
    root: Option<Utf8PathBuf>,

    /// JSON configuration file.
    #[arg(short, long, global = true, env = "CG_AUTOIMPORT_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Discovery glob, relative to the root.
    #[arg(long, global = true)]
    pattern: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List catalogue symbols.
    Symbols {
        /// Only symbols whose short name starts with this prefix.
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Completion proposals for a prefix (JSON).
    Complete {
        /// Short name prefix.
        prefix: String,

        /// Document the completion is for; adds import edits.
        #[arg(short, long)]
        document: Option<Utf8PathBuf>,
    },

    /// The import statement a document needs for a symbol.
    Import {
        /// Short name of the symbol.
        name: String,

        /// Document to insert the import into.
        #[arg(short, long)]
        document: Utf8PathBuf,
    },

    /// Quick fix for an unresolved identifier (JSON).
    Fix {
        /// Document containing the identifier.
        #[arg(short, long)]
        document: Utf8PathBuf,

        /// Line of the identifier (0-indexed).
        #[arg(long)]
        line: u32,

        /// First character of the identifier (0-indexed).
        #[arg(long)]
        start: u32,

        /// Character after the identifier.
        #[arg(long)]
        end: u32,

        /// Diagnostic code reported for the identifier.
        #[arg(long, default_value_t = 2304)]
        code: u32,
    },

    /// Display markup and reconstructed file content of one symbol.
    Show {
        /// Fully qualified name, e.g. `CG.Core.Widget`.
        qualified_name: String,
    },
}

/// Output format for listings.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One line per symbol.
    Text,
    /// JSON array.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set. Otherwise uses `debug` with `--verbose` and
/// `info` by default. Logs go to stderr so stdout stays machine readable.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the file can't be loaded or the result is invalid.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => Config::default(),
    };

    if let Some(root) = &cli.root {
        config.discovery.root.clone_from(root);
    }
    if let Some(pattern) = &cli.pattern {
        config.discovery.pattern.clone_from(pattern);
    }

    config.validate()?;
    config.validate_root()?;
    Ok(config)
}

/// Creates the advisor and fills its catalogue from disk.
///
/// The refresh runs on a blocking thread and reports progress over a
/// channel.
async fn load_advisor(config: &Config) -> color_eyre::Result<ImportAdvisor> {
    info!(root = %config.discovery.root, pattern = %config.discovery.pattern, "Indexing declarations");

    let source = Arc::new(FsDeclarationSource::new(&config.discovery)?);
    let advisor = ImportAdvisor::with_config(config.advisor.clone());

    let (tx, mut rx) = mpsc::channel(256);
    let worker = advisor.clone();
    let refresh = tokio::task::spawn_blocking(move || worker.refresh_streaming(source.as_ref(), tx));

    let mut summary = StatsSnapshot::default();
    while let Some(update) = rx.recv().await {
        match update {
            RefreshUpdate::FilesDiscovered(count) => debug!(count, "Declaration files found"),
            RefreshUpdate::FileIngested { file, declarations } => {
                debug!(file = %file, declarations, "Indexed");
            }
            RefreshUpdate::FileError { file, error } => {
                warn!(file = %file, error = %error, "Skipped unreadable file");
            }
            RefreshUpdate::Complete(stats) => summary = stats,
        }
    }
    refresh.await??;

    info!(
        files = summary.ingested,
        declarations = summary.declarations,
        errors = summary.errors,
        "Catalogue ready"
    );
    Ok(advisor)
}

fn read_document(path: &Utf8Path) -> color_eyre::Result<String> {
    std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read document {path}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn run_symbols(advisor: &ImportAdvisor, prefix: &str, format: OutputFormat) -> color_eyre::Result<()> {
    let symbols = advisor.catalog().suggest(prefix);
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Text => {
            for decl in &symbols {
                writeln!(handle, "{:<40} {}", decl.autocomplete_label(), decl.detail())?;
            }
            writeln!(handle)?;
            writeln!(handle, "{} symbols", symbols.len())?;
        }
        OutputFormat::Json => {
            let declarations: Vec<_> = symbols.iter().map(Arc::as_ref).collect();
            serde_json::to_writer_pretty(&mut handle, &declarations)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

fn run_complete(
    advisor: &ImportAdvisor,
    prefix: &str,
    document: Option<&Utf8Path>,
) -> color_eyre::Result<()> {
    let text = document.map(read_document).transpose()?;
    let proposals = advisor.completions(prefix, text.as_deref());
    info!(prefix, count = proposals.len(), "Completions");
    write_json(&proposals)
}

fn run_import(advisor: &ImportAdvisor, name: &str, document: &Utf8Path) -> color_eyre::Result<()> {
    let decl = advisor
        .catalog()
        .find_by_short_name(name)
        .ok_or_else(|| eyre!("Unknown symbol: {name}"))?;
    let text = read_document(document)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match resolve_import_insertion_point(&text, &decl) {
        Some(edit) => {
            writeln!(handle, "Insert at line {}:", edit.position.line)?;
            write!(handle, "{}", edit.text)?;
        }
        None => writeln!(handle, "{} is already imported", decl.qualified_name())?,
    }
    Ok(())
}

fn run_fix(
    advisor: &ImportAdvisor,
    document: &Utf8Path,
    range: TextRange,
    code: u32,
) -> color_eyre::Result<()> {
    let text = read_document(document)?;
    let diagnostic = Diagnostic::new(range, code, advisor.config().diagnostic_source.clone());
    let fixes = advisor.code_fixes(&text, range, &[diagnostic]);
    if fixes.is_empty() {
        info!(line = range.start.line, "No fix available");
    }
    write_json(&fixes)
}

fn run_show(advisor: &ImportAdvisor, qualified_name: &str) -> color_eyre::Result<()> {
    let decl = advisor
        .catalog()
        .find_by_qualified_name(qualified_name)
        .ok_or_else(|| eyre!("Unknown symbol: {qualified_name}"))?;
    let siblings = advisor.catalog().siblings(&decl);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", decl.title())?;
    writeln!(handle, "{}", decl.detail())?;
    writeln!(handle)?;
    writeln!(handle, "{}", decl.display_markup())?;
    writeln!(handle)?;
    writeln!(handle, "{}", decl.file_content(siblings.iter().map(Arc::as_ref)))?;
    let line = decl.line_number(siblings.iter().map(Arc::as_ref));
    if line > 0 {
        writeln!(handle)?;
        writeln!(handle, "Declared at line {line}")?;
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(value: &T) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let config = build_config(&cli)?;
    let advisor = load_advisor(&config).await?;

    match &cli.command {
        Commands::Symbols { prefix, format } => run_symbols(&advisor, prefix, *format),
        Commands::Complete { prefix, document } => {
            run_complete(&advisor, prefix, document.as_deref())
        }
        Commands::Import { name, document } => run_import(&advisor, name, document),
        Commands::Fix {
            document,
            line,
            start,
            end,
            code,
        } => run_fix(
            &advisor,
            document,
            TextRange::on_line(*line, *start, *end),
            *code,
        ),
        Commands::Show { qualified_name } => run_show(&advisor, qualified_name),
    }
}
