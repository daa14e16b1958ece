//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "synbundle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a bundle archive
    Build(BuildArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Operation name used in machine-readable output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Build(_) => "build",
            Self::Completion(_) => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct BuildArgs {
    /// Output bundle path (default: bundle-<SYMBOLIC_NAME>-<VERSION>.jar)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Bundle-SymbolicName header
    #[arg(short = 'n', long, value_name = "NAME")]
    pub symbolic_name: Option<String>,

    /// Bundle-Version header
    #[arg(long, value_name = "VERSION")]
    pub bundle_version: Option<String>,

    /// Mark the symbolic name as a singleton
    #[arg(long)]
    pub singleton: bool,

    /// Extra manifest header (can be repeated)
    #[arg(short = 'H', long = "header", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub headers: Vec<(String, String)>,

    /// Add an external file at an archive path (can be repeated)
    #[arg(long = "file", value_name = "PATH=SOURCE", value_parser = parse_file_binding)]
    pub files: Vec<(String, PathBuf)>,

    /// Add inline text at an archive path (can be repeated)
    #[arg(short = 'c', long = "content", value_name = "PATH=TEXT", value_parser = parse_key_value)]
    pub contents: Vec<(String, String)>,

    /// Start from an empty manifest instead of the default headers
    #[arg(long)]
    pub no_default_headers: bool,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse `KEY=VALUE`, splitting on the first `=`. The value may be empty.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;

    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }

    Ok((key.to_string(), value.to_string()))
}

/// Parse `PATH=SOURCE` for external file bindings.
fn parse_file_binding(s: &str) -> Result<(String, PathBuf), String> {
    let (path, source) = parse_key_value(s)?;
    if source.is_empty() {
        return Err(format!("empty source file in '{s}'"));
    }
    Ok((path, PathBuf::from(source)))
}
