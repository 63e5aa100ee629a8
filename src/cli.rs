use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chapter-split")]
#[command(about = "A CLI tool for splitting PDF documents into chapter files based on their bookmarks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base directory for the `<name>_chapters` folder (default: next to the input)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a PDF into one file per chapter
    Split(SplitArgs),

    /// Show how a PDF would be split without writing anything
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Input PDF file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Deepest bookmark level that can start a chapter (0 = top level)
    #[arg(long, default_value = "0")]
    pub max_depth: usize,

    /// JSON file with classification rules replacing the defaults
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Fail instead of using every bookmark when no chapter-level bookmark is found
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct SplitArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Do not prefix output file names with a sequence number
    #[arg(long)]
    pub no_sequence: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Output the plan to a JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Also list every bookmark found in the outline
    #[arg(long)]
    pub detailed: bool,
}
