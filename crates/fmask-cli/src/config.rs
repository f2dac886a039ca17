//! Command-line argument parsing.

use clap::Parser;

/// Runs the Fmask classifier over a synthetic demo scene and reports its
/// scene-wide statistics and mask histogram.
#[derive(Parser, Debug)]
#[command(name = "fmask")]
#[command(version)]
#[command(about = "Potential cloud/cloud-shadow/snow mask demo harness")]
pub struct CliArgs {
    /// Number of rows in the synthetic demo scene.
    #[arg(long, default_value_t = 8)]
    pub rows: usize,

    /// Number of columns in the synthetic demo scene.
    #[arg(long, default_value_t = 8)]
    pub cols: usize,

    /// Cloud probability threshold added to the dynamic P4 percentile.
    #[arg(long, default_value_t = 22.5)]
    pub cloud_prob_threshold: f64,

    /// Seed controlling the synthetic scene's per-pixel variation.
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Emit per-pass diagnostics at debug level: raises the local logger's
    /// filter (overriding `RUST_LOG`) and is threaded through to the engine
    /// itself, which gates its own per-pass `log::debug!` calls on it.
    #[arg(long)]
    pub verbose: bool,
}
