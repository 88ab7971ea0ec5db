//! Report inspection binary
//!
//! Pretty-prints a saved mining report.

use anomalog::analysis::report::Report;
use anyhow::Result;
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Pretty-print a saved mining report")]
struct Args {
    /// report written by the mine binary
    report: std::path::PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let report = Report::load(&args.report)?;
    print!("{}", report);
    Ok(())
}
