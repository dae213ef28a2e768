use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "vmq",
    version,
    about = "Value model maturity rollup and quality assessment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Assess(AssessArgs),
    Maturity(MaturityArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AssessArgs {
    /// JSON snapshot of per-file value models.
    #[arg(long)]
    pub models: PathBuf,

    #[arg(long)]
    pub portfolio: Option<PathBuf>,

    /// JSON list of features with their `contributes_to` component paths.
    #[arg(long)]
    pub features: Option<PathBuf>,

    #[arg(long)]
    pub policy: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    /// Fail when the overall score is below this value. Falls back to
    /// `VMQ_MIN_SCORE`.
    #[arg(long)]
    pub min_score: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct MaturityArgs {
    #[arg(long)]
    pub models: PathBuf,

    #[arg(long)]
    pub track: Option<String>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
