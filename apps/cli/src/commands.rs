//! CLI command definitions, routing, and tracing setup.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docatlas_markdown::{BatchSummary, Fix, enforce_copyright, run_fix};
use docatlas_rag::{
    ConsolidateProgress, ConsolidateResult, Consolidator, GitHistory, SystemClock,
};
use docatlas_shared::{
    AppConfig, CopyrightConfig, DocAtlasError, RagConfig, init_config, load_config,
};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// DocAtlas: maintenance tooling for a Markdown documentation site.
#[derive(Parser)]
#[command(
    name = "docatlas",
    version,
    about = "Consolidate, lint, and tidy a Markdown documentation corpus.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Flatten the Markdown corpus into ./rag with metadata sidecars and zip it.
    Rag {
        /// Corpus root (defaults to the current directory).
        source: Option<PathBuf>,

        /// Directory that receives rag.zip (defaults to the current directory).
        destination: Option<PathBuf>,
    },

    /// Insert or replace the copyright header in Markdown files.
    Copyright {
        /// Markdown file or directory (defaults to the current directory).
        path: Option<PathBuf>,
    },

    /// Check external links in generated HTML for target/rel attributes.
    LintLinks {
        /// Directory of HTML files.
        directory: PathBuf,
    },

    /// Apply a style fix to every Markdown file under a directory.
    Fix {
        #[command(subcommand)]
        kind: FixKind,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Style fixes.
#[derive(Subcommand)]
pub(crate) enum FixKind {
    /// Normalize content-level markers to **Content Level: N**.
    ContentLevel {
        /// Directory to process (defaults to the current directory).
        directory: Option<PathBuf>,
    },
    /// Normalize "Suggested Pre-Reading" headings.
    Prereading {
        /// Directory to process (defaults to the current directory).
        directory: Option<PathBuf>,
    },
    /// Normalize "TL;DR" headings.
    Tldr {
        /// Directory to process (defaults to the current directory).
        directory: Option<PathBuf>,
    },
    /// Replace Markdown images with centered fixed-width <img> tags.
    Images {
        /// Directory to process (defaults to the current directory).
        directory: Option<PathBuf>,
    },
}

impl FixKind {
    fn split(self) -> (Fix, Option<PathBuf>) {
        match self {
            FixKind::ContentLevel { directory } => (Fix::ContentLevel, directory),
            FixKind::Prereading { directory } => (Fix::Prereading, directory),
            FixKind::Tldr { directory } => (Fix::Tldr, directory),
            FixKind::Images { directory } => (Fix::Images, directory),
        }
    }
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docatlas=info",
        1 => "docatlas=debug",
        _ => "docatlas=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Rag {
            source,
            destination,
        } => cmd_rag(source, destination),
        Command::Copyright { path } => cmd_copyright(path),
        Command::LintLinks { directory } => cmd_lint_links(&directory),
        Command::Fix { kind } => {
            let (fix, directory) = kind.split();
            cmd_fix(fix, directory)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))
}

/// Exit with status 1 on a configuration error (bad input path); pass every
/// other error up to color-eyre.
fn exit_on_config_error<T>(result: docatlas_shared::Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(DocAtlasError::Config { message }) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// rag
// ---------------------------------------------------------------------------

fn cmd_rag(source: Option<PathBuf>, destination: Option<PathBuf>) -> Result<()> {
    let cwd = current_dir()?;
    let source = source.unwrap_or_else(|| cwd.clone());
    let destination = destination.unwrap_or_else(|| cwd.clone());

    let app = load_config()?;
    let config = RagConfig::from_app(&app, &cwd)?;

    info!(
        source = %source.display(),
        destination = %destination.display(),
        "consolidating corpus"
    );

    let history = GitHistory;
    let clock = SystemClock;
    let reporter = CliProgress::new();
    let result = exit_on_config_error(
        Consolidator::new(&config, &history, &clock).run(&source, &destination, &reporter),
    )?;

    println!();
    println!("  Process complete!");
    println!(
        "  - {} files consolidated in: {}",
        result.consolidated(),
        result.staging_dir.display()
    );
    println!("  - {} metadata files created", result.consolidated());
    if result.skipped > 0 {
        println!("  - {} files skipped (see warnings)", result.skipped);
    }
    println!("  - All files zipped to: {}", result.archive_path.display());
    println!("  - Time: {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar.
///
/// Per-file lines go to `out` with the bar suspended, so they are printed
/// even when the bar is hidden (stderr not a terminal).
struct CliProgress<W: Write = io::Stdout> {
    bar: ProgressBar,
    out: RefCell<W>,
}

impl CliProgress {
    fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl<W: Write> CliProgress<W> {
    fn with_output(out: W) -> Self {
        let bar = ProgressBar::hidden();
        if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        Self {
            bar,
            out: RefCell::new(out),
        }
    }

    fn line(&self, text: std::fmt::Arguments<'_>) {
        self.bar.suspend(|| {
            let mut out = self.out.borrow_mut();
            let _ = writeln!(out, "{text}");
        });
    }
}

impl<W: Write> ConsolidateProgress for CliProgress<W> {
    fn discovered(&self, total: usize) {
        if total == 0 {
            self.line(format_args!("No .md files found"));
            return;
        }
        self.line(format_args!("Found {total} markdown files"));
        self.bar.set_length(total as u64);
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn file_copied(&self, source: &Path, staged: &Path, current: usize, _total: usize) {
        self.line(format_args!(
            "Copied: {} -> {}",
            source.display(),
            staged.display()
        ));
        self.bar.set_position(current as u64);
    }

    fn metadata_written(&self, path: &Path) {
        self.bar.set_message(format!("{}", path.display()));
    }

    fn done(&self, _result: &ConsolidateResult) {
        self.bar.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// copyright / fix
// ---------------------------------------------------------------------------

fn cmd_copyright(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => current_dir()?,
    };
    let config = CopyrightConfig::from(&load_config()?);

    println!("Processing markdown files in: {}", path.display());
    println!("Looking for copyright statement:\n{}\n", config.notice);

    let summary = exit_on_config_error(enforce_copyright(&path, &config))?;
    println!(
        "Processing complete! Updated {} out of {} markdown files.",
        summary.updated, summary.total
    );
    Ok(())
}

fn cmd_fix(fix: Fix, directory: Option<PathBuf>) -> Result<()> {
    let directory = match directory {
        Some(d) => d,
        None => current_dir()?,
    };

    println!("Processing markdown files in: {}", directory.display());
    let summary = exit_on_config_error(run_fix(fix, &directory))?;
    print_fix_summary(fix, &summary);

    if fix == Fix::Images && summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_fix_summary(fix: Fix, summary: &BatchSummary) {
    println!();
    println!("Processing complete!");
    match fix {
        Fix::Images => {
            println!(
                "Successfully processed files: {}",
                summary.total - summary.failed
            );
            if summary.failed > 0 {
                eprintln!("Files with errors: {}", summary.failed);
            }
        }
        _ => {
            println!("Updated {} out of {} files.", summary.updated, summary.total);
            if summary.warnings > 0 {
                println!("Warnings: {}", summary.warnings);
            }
            if summary.failed > 0 {
                println!("Files with errors: {}", summary.failed);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// lint-links
// ---------------------------------------------------------------------------

fn cmd_lint_links(directory: &Path) -> Result<()> {
    if !directory.is_dir() {
        eprintln!("The provided path is not a valid directory.");
        std::process::exit(1);
    }

    println!("Linting HTML files in: {}", directory.display());
    let report = exit_on_config_error(docatlas_lint::lint_directory(directory))?;

    if report.has_errors() {
        println!();
        println!("{report}");
        std::process::exit(1);
    }

    println!("No errors found.");
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
