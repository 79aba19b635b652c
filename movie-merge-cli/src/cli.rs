// movie-merge-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "movie-merge: Merge folders of home videos into single movies",
    long_about = "Merges dated event folders of video clips into one movie file per event, using ffmpeg via the movie-merge-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merges event folders from an input root into an output root
    Merge(MergeArgs),
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Input root containing `<year>/<date> - <title>` event folders
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_ROOT")]
    pub input_root: PathBuf,

    /// Root directory where merged movies will be written
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_ROOT")]
    pub output_root: PathBuf,

    /// Comma separated list of years to process (default: all years)
    #[arg(short = 'y', long, value_delimiter = ',', value_name = "YEARS")]
    pub years: Vec<i32>,

    /// Number of events to merge concurrently
    #[arg(
        short = 'w',
        long,
        default_value_t = movie_merge_core::DEFAULT_WORKERS,
        value_name = "COUNT"
    )]
    pub workers: usize,

    /// Overwrite existing output files (default: skip events whose output exists)
    #[arg(long)]
    pub force: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,
}
