use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::types::{ListFormat, OutputFormat, PatternArg, PresetArg, PreviewArg, SizeArg};

/// Previewable, undoable batch file renaming
#[derive(Parser, Debug)]
#[command(name = "quickren")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Assume yes for all prompts
    #[arg(short = 'y', long = "yes", global = true, env = "QUICKREN_YES")]
    pub yes: bool,
}

/// Which files to pick up
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// File-name glob patterns, e.g. "*.jpg,*.png"
    #[arg(long, value_delimiter = ',')]
    pub glob: Vec<String>,

    /// Extension preset, used when no --glob is given
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Include files in subdirectories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Only keep files whose name contains this text
    #[arg(long)]
    pub search: Option<String>,

    /// Match --search case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,

    /// Size bucket
    #[arg(long, value_enum, default_value = "all")]
    pub size: SizeArg,
}

/// How new names are built
#[derive(Args, Debug, Clone)]
pub struct PatternArgs {
    /// Naming scheme (defaults to the configured pattern)
    #[arg(short = 'p', long, value_enum)]
    pub pattern: Option<PatternArg>,

    /// Prefix for the sequential pattern
    #[arg(long)]
    pub prefix: Option<String>,

    /// First number in the sequence
    #[arg(long)]
    pub start: Option<u64>,

    /// Zero-padding width of the number
    #[arg(long)]
    pub width: Option<usize>,

    /// strftime format for the date pattern
    #[arg(long)]
    pub date_format: Option<String>,

    /// Template for the custom pattern, e.g. "{parent}_{name}_{index}"
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a rename plan and preview it
    Plan {
        /// Directory to rename files in
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        pattern: PatternArgs,

        /// Preview format (defaults to the configured format)
        #[arg(long, value_enum)]
        preview: Option<PreviewArg>,

        /// Where to write the plan
        #[arg(long)]
        plan_out: Option<PathBuf>,

        /// Only show the preview, do not write a plan
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Apply the pending plan, or a plan file
    Apply {
        /// Plan file to apply (defaults to .quickren/plan.json)
        plan: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Plan and apply in one step
    Rename {
        /// Directory to rename files in
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        pattern: PatternArgs,

        /// Preview format shown before confirming
        #[arg(long, value_enum)]
        preview: Option<PreviewArg>,

        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Reverse the last apply
    Undo {
        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the pending plan and undo state
    Status {
        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show past applies and undos
    History {
        /// Show only the N most recent entries
        #[arg(long)]
        limit: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the files a selection picks up, with totals
    List {
        /// Directory to list
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: ListFormat,

        /// Only print the totals line
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print version information
    Version {
        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}
