use std::path::PathBuf;

use spatialorder::process::{DEFAULT_FIELD_NAME, DEFAULT_START_ID};

/// Point ordering CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "spatialorder", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Rank points by a nearest-neighbor walk from a starting feature (forbids stdout)
    Order(OrderArgs),
}

#[derive(clap::Args, Debug)]
pub struct OrderArgs {
    /// Input point layer (.geojson, .json or .shp); must not have overlapping points
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output layer, same format as the input
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// ID of starting point
    #[arg(short, long, default_value_t = DEFAULT_START_ID)]
    pub start_id: u64,

    /// Name of field to store point positions
    #[arg(short, long, default_value = DEFAULT_FIELD_NAME)]
    pub field_name: String,

    /// Attribute holding feature ids (defaults to the layer's own feature ids)
    #[arg(long)]
    pub id_field: Option<String>,

    /// Also write the id -> rank mapping as JSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub ranks: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Overwrite if the output exists
    #[arg(long)]
    pub force: bool,
}
