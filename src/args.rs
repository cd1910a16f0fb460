use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["frames", "masks"])))]
pub struct Args {
    /// Replay recorded contours (one JSON frame per line)
    #[arg(long)]
    pub frames: Option<PathBuf>,

    /// Directory of binary hand masks (*.png), processed in name order
    #[arg(long)]
    pub masks: Option<PathBuf>,

    /// Configuration file (created with defaults when missing)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Override the telemetry report directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Do not write the CSV performance log
    #[arg(long, default_value_t = false)]
    pub no_telemetry: bool,

    /// Suppress per-frame console output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}
