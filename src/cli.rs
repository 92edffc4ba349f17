use clap::Parser;
use std::path::PathBuf;

/// Walk through a recipe one step at a time, with a timer for timed steps.
#[derive(Parser, Debug)]
#[command(name = "recipe-guide")]
#[command(version)]
pub struct Cli {
    /// Recipe file (`seconds|description` per line, or a .yaml step file).
    /// Asked for interactively when omitted.
    pub recipe: Option<PathBuf>,

    /// Use the full-screen dashboard instead of the line-based prompts.
    #[arg(long)]
    pub tui: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
