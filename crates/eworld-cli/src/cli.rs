//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use eworld_engine::finder::DEFAULT_TIMEOUT_SECS;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Walks an agent through an Envelope World and reports, step by step, which \
    cells provably hold no envelope.\n\n\
    Example:\n  \
    eworld run --dim 5 --steps demos/world1/steps.txt --envelopes demos/world1/envelopes.txt";

#[derive(Parser)]
#[command(name = "eworld")]
#[command(about = "SAT-based envelope finder for the Envelope World")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the finder and print the knowledge after every step
    #[command(display_order = 0)]
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Output format: text | json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the static world formula as SMT-LIB2 to this file
        #[arg(long)]
        dump_smt: Option<PathBuf>,
    },

    /// Run the finder and compare every step with stored snapshots
    #[command(display_order = 1)]
    Check {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Expected knowledge grids, one block per step
        #[arg(long)]
        states: PathBuf,
    },
}

#[derive(Args)]
pub(crate) struct ScenarioArgs {
    /// World side length
    #[arg(long)]
    pub(crate) dim: u32,

    /// File with the walk, as `row,col` tokens
    #[arg(long)]
    pub(crate) steps: PathBuf,

    /// File with the envelope cells, as `row,col` tokens
    #[arg(long)]
    pub(crate) envelopes: PathBuf,

    /// Only run the first N steps
    #[arg(long)]
    pub(crate) num_steps: Option<usize>,

    /// Oracle timeout per query in seconds (0 disables it)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(miette::miette!(
            "Unknown output format: {other}. Use 'text' or 'json'."
        )),
    }
}
