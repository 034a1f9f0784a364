//! Sweep CPPI over a floor x multiplier grid in parallel
//!
//! Outputs one CSV row per (policy, floor, multiplier)

use anyhow::{Context, Result};
use clap::Parser;
use cppi_engine::{
    returns::{load_ticker, DualReturnSeries},
    run_sweep, RebalanceFrequency, SweepParams,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(about = "Run a CPPI parameter sweep")]
struct Args {
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[arg(long, default_value = "SPY")]
    risky: String,

    #[arg(long, default_value = "SHY")]
    safe: String,

    /// JSON grid file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated floors, e.g. 0.7,0.8,0.9
    #[arg(long, value_delimiter = ',')]
    floors: Option<Vec<f64>>,

    /// Comma-separated multipliers, e.g. 2,3,4,5
    #[arg(long, value_delimiter = ',')]
    multipliers: Option<Vec<f64>>,

    #[arg(long)]
    frequency: Option<RebalanceFrequency>,

    #[arg(long, default_value = "cppi_sweep.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => SweepParams::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SweepParams::default(),
    };
    if let Some(floors) = args.floors.clone() {
        params.floors = floors;
    }
    if let Some(multipliers) = args.multipliers.clone() {
        params.multipliers = multipliers;
    }
    if let Some(frequency) = args.frequency {
        params.rebalance_frequency = frequency;
    }

    let start = Instant::now();
    let risky = load_ticker(&args.data_dir, &args.risky)
        .with_context(|| format!("Failed to load prices for {}", args.risky))?;
    let safe = load_ticker(&args.data_dir, &args.safe)
        .with_context(|| format!("Failed to load prices for {}", args.safe))?;
    let returns = DualReturnSeries::align(&risky.pct_change(), &safe.pct_change())?;

    println!(
        "Running {} simulations over {} trading days...",
        params.grid_size(),
        returns.len()
    );
    let rows = run_sweep(&returns, &params)?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let frozen = rows.iter().filter(|r| r.frozen).count();
    if let Some(best) = rows
        .iter()
        .filter(|r| r.sharpe_ratio.is_some())
        .max_by(|a, b| a.sharpe_ratio.partial_cmp(&b.sharpe_ratio).unwrap_or(std::cmp::Ordering::Equal))
    {
        println!(
            "Best Sharpe: {} floor={} m={} (Sharpe={:.3}, MDD={:.2}%)",
            best.policy,
            best.floor,
            best.multiplier,
            best.sharpe_ratio.unwrap_or_default(),
            best.max_drawdown * 100.0
        );
    }
    println!("{} of {} runs frozen", frozen, rows.len());
    println!("Output written to {} in {:?}", args.output.display(), start.elapsed());
    Ok(())
}
