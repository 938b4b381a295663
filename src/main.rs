// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use tmxalign::app_config::{self, Config};
use tmxalign::errors::AppError;
use tmxalign::file_utils::FileManager;
use tmxalign::language_utils::display_label;
use tmxalign::{parse_tmx, EditingSession};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show rows, languages and empty cells of TMX files
    Info {
        /// TMX files or directories (searched recursively)
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Parse and write a TMX file again, normalizing its formatting
    Resave {
        /// TMX file to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Write here instead of overwriting the input
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Do not keep a .bak copy of the replaced file
        #[arg(long)]
        no_backup: bool,
    },

    /// Replace text in every cell as one editing step and save
    Replace {
        /// TMX file to edit
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Text to search for
        #[arg(long = "find", value_name = "TEXT")]
        query: String,

        /// Replacement text (inserted literally)
        #[arg(long = "with", value_name = "TEXT")]
        replacement: String,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Report how many cells would change without saving
        #[arg(long)]
        dry_run: bool,

        /// Write here instead of overwriting the input
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for tmxalign
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// tmxalign - TMX alignment editor
///
/// Inspects and repairs sentence alignment in TMX translation memories.
#[derive(Parser, Debug)]
#[command(name = "tmxalign")]
#[command(version)]
#[command(about = "TMX alignment editing tool")]
#[command(long_about = "tmxalign reads TMX translation memories as two aligned columns and writes them back
without losing attributes, notes, extra languages or inline markup of untouched segments.

EXAMPLES:
    tmxalign info memory.tmx                         # Rows, languages and empty cells
    tmxalign info ./memories/                        # Every .tmx file below a directory
    tmxalign resave memory.tmx -o clean.tmx          # Normalize formatting into a new file
    tmxalign replace memory.tmx --find Colour --with Color
    tmxalign replace memory.tmx --find foo --with bar --dry-run
    tmxalign completions bash > tmxalign.bash        # Generate bash completions

CONFIGURATION:
    Settings are read from ~/.tmxalign/config.json when present, or from the file
    given with --config. Missing settings fall back to built-in defaults.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger with the most verbose level and narrow it
    // once the configuration is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "tmxalign", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::Info { paths } => run_info(&paths)?,
        Commands::Resave { input, output, no_backup } => {
            if no_backup {
                config.backup_on_save = false;
            }
            run_resave(&input, output.as_deref(), &config)?
        }
        Commands::Replace {
            input,
            query,
            replacement,
            case_sensitive,
            dry_run,
            output,
        } => run_replace(
            &input,
            output.as_deref(),
            &query,
            &replacement,
            case_sensitive,
            dry_run,
            &config,
        )?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load configuration from an explicit path or the per-user default
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => match Config::default_path() {
            Some(default_path) if FileManager::file_exists(&default_path) => {
                debug!("Using configuration from {:?}", default_path);
                Config::load(default_path)
            }
            _ => Ok(Config::default()),
        },
    }
}

fn run_info(paths: &[PathBuf]) -> Result<(), AppError> {
    let files = FileManager::collect_inputs(paths, "tmx")?;
    if files.is_empty() {
        warn!("No .tmx files found");
        return Ok(());
    }

    for file in files {
        let document = parse_tmx(&file)?;
        let stats = document.stats();

        println!("{}", file.display());
        println!("  rows:            {}", stats.rows);
        println!("  source:          {}", display_label(document.source_lang()));
        println!("  target:          {}", display_label(document.target_lang()));
        println!("  empty source:    {}", stats.empty_source);
        println!("  empty target:    {}", stats.empty_target);
        println!("  blank rows:      {}", stats.blank_rows);
        println!("  extra languages: {} rows", stats.rows_with_extras);
    }
    Ok(())
}

fn run_resave(input: &Path, output: Option<&Path>, config: &Config) -> Result<(), AppError> {
    let mut session = EditingSession::open(input, config)?;
    let saved = session.save_as(output.unwrap_or(input))?;
    info!("Wrote {} rows to {}", session.document().row_count(), saved.display());
    Ok(())
}

fn run_replace(
    input: &Path,
    output: Option<&Path>,
    query: &str,
    replacement: &str,
    case_sensitive: bool,
    dry_run: bool,
    config: &Config,
) -> Result<(), AppError> {
    let mut session = EditingSession::open(input, config)?;
    let count = session.replace_all(query, replacement, case_sensitive)?;

    if dry_run {
        println!("{} cell(s) would change", count);
        return Ok(());
    }
    if count == 0 && output.is_none() {
        println!("No cells matched {:?}", query);
        return Ok(());
    }

    let saved = session.save_as(output.unwrap_or(input))?;
    println!("Replaced in {} cell(s), saved to {}", count, saved.display());
    Ok(())
}
