use adn_core::ReviewDecision;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

#[derive(Parser, Debug)]
#[command(name = "adn")]
#[command(about = "adn - Document and note automation: PDF and CSV records to reviewed Markdown notes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings, errors and final results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Set log level (overrides --verbose, --quiet, RUST_LOG and the config file)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Configuration directory (defaults to $ADN_CONFIG_DIR or ~/.adn)
    #[arg(short = 'C', long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate extraction notes for PDF files
    #[command(name = "gen-md-from-pdf")]
    GenMdFromPdf(PdfArgs),

    /// Convert CSV records to numbered Markdown notes
    #[command(name = "csv-to-md", subcommand)]
    CsvToMd(CsvCommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List PDF files and whether they already have a note
    #[command(name = "list-files")]
    ListFiles {
        /// Directory to scan (defaults to the current directory)
        directory: Option<PathBuf>,

        /// File pattern
        #[arg(short, long, default_value = adn_pipeline::DEFAULT_PATTERN)]
        pattern: String,

        /// Include files that were already processed
        #[arg(long)]
        processed: bool,
    },

    /// Show processing progress and review stages for a directory
    Status {
        /// Directory to inspect (defaults to the current directory)
        directory: Option<PathBuf>,
    },

    /// Remove temporary files and caches
    Clean {
        /// Directory to clean (defaults to the current directory)
        directory: Option<PathBuf>,

        /// Only show what would be removed
        #[arg(long)]
        dry_run: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Record reviewer decisions on a generated note
    #[command(subcommand)]
    Review(ReviewCommands),
}

/// Options shared by the batch commands
#[derive(Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// Template name (defaults to the configured template)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Overwrite existing notes
    #[arg(short, long)]
    pub force: bool,

    /// Regenerate notes that already exist
    #[arg(long)]
    pub no_skip_existing: bool,

    /// Parallel workers (0 = one per CPU; defaults to the configured value)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

#[derive(Args, Debug)]
pub struct PdfArgs {
    /// PDF files to process
    #[arg(conflicts_with_all = ["all", "glob"])]
    pub files: Vec<PathBuf>,

    /// Process every PDF in a directory
    #[arg(long, conflicts_with = "glob")]
    pub all: bool,

    /// Directory scanned by --all (defaults to the current directory)
    #[arg(short, long, requires = "all")]
    pub dir: Option<PathBuf>,

    /// File pattern used by --all
    #[arg(short, long, default_value = adn_pipeline::DEFAULT_PATTERN)]
    pub pattern: String,

    /// Glob expression selecting PDF files (e.g. "papers/**/*.pdf")
    #[arg(long)]
    pub glob: Option<String>,

    /// Output directory (defaults to each PDF's directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub batch: BatchArgs,
}

#[derive(Subcommand, Debug)]
pub enum CsvCommands {
    /// Convert every row of a CSV file to a note
    Convert {
        /// CSV file with source, doi, title and abstract columns
        csv: PathBuf,

        /// Output directory (defaults to the configured output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of the first note
        #[arg(short, long, default_value_t = 1)]
        start: usize,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Check a CSV file without writing anything
    Validate {
        csv: PathBuf,
    },
}

/// Format for `config show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ShowFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create the configuration directory and a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the current configuration
    Show {
        #[arg(long, value_enum, default_value_t)]
        format: ShowFormat,
    },

    /// Print one configuration value
    Get { key: String },

    /// Change one configuration value
    Set { key: String, value: String },

    /// Restore the default configuration
    Reset,

    /// Check the configuration for errors
    Validate,

    /// Save a timestamped copy of the config file
    Backup {
        /// List existing backups instead of creating one
        #[arg(long)]
        list: bool,
    },

    /// Replace the config file with a backup
    Restore { file: PathBuf },

    /// Print the config file location
    Path,
}

/// Decision values accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecisionArg {
    Approved,
    Rejected,
    Unset,
}

impl From<DecisionArg> for ReviewDecision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Approved => ReviewDecision::Approved,
            DecisionArg::Rejected => ReviewDecision::Rejected,
            DecisionArg::Unset => ReviewDecision::Unset,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ReviewCommands {
    /// Show the review state and the actions currently offered
    Show {
        note: PathBuf,

        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record the first and/or second reviewer decision
    Set {
        note: PathBuf,

        #[arg(long, value_enum)]
        first: Option<DecisionArg>,

        #[arg(long, value_enum)]
        second: Option<DecisionArg>,
    },

    /// Move an approved note into extraction
    Extract { note: PathBuf },

    /// Take one step back through the workflow
    Back { note: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_batch_flags() {
        let cli = Cli::try_parse_from([
            "adn", "csv-to-md", "convert", "records.csv", "-s", "10", "-j", "4", "--force",
        ])
        .unwrap();
        match cli.command {
            Commands::CsvToMd(CsvCommands::Convert { start, batch, .. }) => {
                assert_eq!(start, 10);
                assert_eq!(batch.jobs, Some(4));
                assert!(batch.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn files_conflict_with_all() {
        assert!(Cli::try_parse_from(["adn", "gen-md-from-pdf", "a.pdf", "--all"]).is_err());
        assert!(Cli::try_parse_from(["adn", "gen-md-from-pdf", "--dir", "x"]).is_err());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["adn", "-v", "-q", "status"]).is_err());
    }
}
