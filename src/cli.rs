use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::filtering::types::Mode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Neighborhood collaborative filtering evaluator")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Predict the test split in one mode and report per-item accuracy
    Evaluate {
        /// Whether neighbors are users or items
        #[arg(short, long, value_enum, default_value_t = Mode::User)]
        mode: Mode,

        #[command(flatten)]
        neighbors: NeighborArgs,

        #[command(flatten)]
        data: DataArgs,

        /// Number of items listed at each end of the error ranking
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Also write the report as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Predict the test split in both modes and compare their RMS error
    Compare {
        #[command(flatten)]
        neighbors: NeighborArgs,

        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct NeighborArgs {
    /// Number of nearest neighbors averaged per prediction
    #[arg(short, long, default_value_t = 20)]
    pub k: usize,

    /// Minimum number of shared ratings for a neighbor to count
    #[arg(long, default_value_t = 0)]
    pub min_overlap: usize,

    /// Users with fewer test ratings are left out of the per-item error
    #[arg(long, default_value_t = 0)]
    pub min_ratings: usize,

    /// Predict on a single thread
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DataArgs {
    /// Training ratings (defaults to $TRAINING_DATA_PATH or ./ua.base)
    #[arg(long)]
    pub training: Option<PathBuf>,

    /// Test ratings (defaults to $TEST_DATA_PATH or ./ua.test)
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// Item names (defaults to $ITEM_NAMES_PATH or ./u.item)
    #[arg(long)]
    pub items: Option<PathBuf>,
}
