// anonymask/src/cli.rs
//! This file defines the command-line interface (CLI) for the anonymask application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use anonymask_core::{CustomPattern, Policy};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "anonymask",
    author = "Anonymask Team",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mask person names and structured identifiers in free text",
    long_about = "Anonymask combines the person-name spans reported by one or more named-entity taggers, replaces every detected name with [Name], and then masks structured identifiers such as NRIC numbers, phone numbers and dates. Tagger output is read from JSON files produced elsewhere.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `anonymask` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Masks an input file or stdin.
    #[command(about = "Masks names and identifiers in an input file or stdin.")]
    Mask(MaskCommand),

    /// Shows the original with every masked region marked, followed by the masked text.
    #[command(about = "Shows the original with masked regions highlighted, and the masked text.")]
    Highlight(HighlightCommand),

    /// Lists the built-in identifier categories.
    #[command(about = "Lists the built-in identifier categories.")]
    Categories,
}

/// Inputs shared by `mask` and `highlight`.
#[derive(Args, Debug, Clone)]
pub struct AnonymizeArgs {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Saved tagger output, as NAME=FILE. Repeat for several sources.
    #[arg(
        long = "source",
        short = 's',
        value_name = "NAME=FILE",
        value_parser = parse_source,
        help = "Tagger output file as NAME=FILE (JSON spans or tokens). May be repeated."
    )]
    pub sources: Vec<SourceArg>,

    /// How to combine several sources.
    #[arg(long, short = 'p', value_enum, help = "How to combine several sources (required with more than one).")]
    pub policy: Option<PolicyChoice>,

    /// Built-in categories to mask, by name or index (comma-separated).
    #[arg(long = "category", short = 'c', value_delimiter = ',', help = "Built-in categories to mask, by name or 1-9 index (comma-separated).")]
    pub categories: Vec<String>,

    /// Extra patterns, as REGEX=>REPLACEMENT.
    #[arg(
        long = "pattern",
        value_name = "REGEX=>REPLACEMENT",
        value_parser = parse_pattern,
        help = "Custom pattern applied after the built-in categories. May be repeated."
    )]
    pub patterns: Vec<CustomPattern>,

    /// Tagger labels treated as person names.
    #[arg(long = "name-label", value_delimiter = ',', help = "Tagger labels treated as person names (default: PERSON,PER).")]
    pub name_labels: Vec<String>,

    /// Path to an anonymization configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "ANONYMASK_CONFIG", help = "Path to an anonymization configuration file (YAML).")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `mask` command.
#[derive(Args, Debug)]
pub struct MaskCommand {
    #[command(flatten)]
    pub inputs: AnonymizeArgs,

    /// Write masked output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Print what each stage replaced.
    #[arg(long, help = "Print a per-stage summary of replacements to stderr.")]
    pub summary: bool,
}

/// Arguments for the `highlight` command.
#[derive(Args, Debug)]
pub struct HighlightCommand {
    #[command(flatten)]
    pub inputs: AnonymizeArgs,

    /// Render marks as `<mark>` elements instead of terminal colors.
    #[arg(long, conflicts_with = "json", help = "Render marks as HTML-style <mark> elements.")]
    pub markup: bool,

    /// Print the highlight segments and masked text as JSON.
    #[arg(long, help = "Print the highlight segments and masked text as JSON.")]
    pub json: bool,
}

/// A `--source NAME=FILE` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArg {
    pub name: String,
    pub path: PathBuf,
}

/// Combination policy as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PolicyChoice {
    /// A character is a name if any source says so.
    Union,
    /// A character is a name only if every source says so.
    Intersection,
}

impl From<PolicyChoice> for Policy {
    fn from(choice: PolicyChoice) -> Self {
        match choice {
            PolicyChoice::Union => Policy::Union,
            PolicyChoice::Intersection => Policy::Intersection,
        }
    }
}

fn parse_source(s: &str) -> Result<SourceArg, String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=FILE, got '{}'", s))?;
    if name.trim().is_empty() || path.trim().is_empty() {
        return Err(format!("expected NAME=FILE, got '{}'", s));
    }
    Ok(SourceArg {
        name: name.trim().to_string(),
        path: PathBuf::from(path),
    })
}

/// Splits at the first `=>`.
fn parse_pattern(s: &str) -> Result<CustomPattern, String> {
    let (pattern, replacement) = s
        .split_once("=>")
        .ok_or_else(|| format!("expected REGEX=>REPLACEMENT, got '{}'", s))?;
    if pattern.is_empty() || replacement.is_empty() {
        return Err(format!("both sides of '=>' must be non-empty in '{}'", s));
    }
    Ok(CustomPattern::new(pattern, replacement))
}
