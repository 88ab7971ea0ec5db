//! Mining binary
//!
//! Runs the co-occurrence pipeline on a comma-separated log extract and
//! writes the report as JSON.

use anomalog::analysis::analysis::Analysis;
use anomalog::analysis::analysis::Config;
use anomalog::analysis::analysis::Threshold;
use anomalog::records::dataset::Dataset;
use anyhow::Result;
use clap::Parser;
use std::collections::HashSet;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Mine a categorical log extract for anomalous pairings"
)]
struct Args {
    /// comma-separated input with a header line of attribute names
    input: std::path::PathBuf,
    /// where to write the report
    #[arg(short, long, default_value = "report.json")]
    output: std::path::PathBuf,
    /// deepest attribute-subset size to score
    #[arg(long, default_value_t = 3)]
    max_level: usize,
    /// minimum marginal support per scored joint
    #[arg(long, default_value_t = 5)]
    t_alpha: i64,
    /// head size per level
    #[arg(long, default_value_t = 20)]
    firsts_n: usize,
    /// fixed mutual-information cutoff; derived from the elbow when absent
    #[arg(long)]
    mu: Option<f64>,
    /// elbow prominence used when no fixed cutoff is given
    #[arg(long, default_value_t = 0.1)]
    prominence: f64,
    /// meta-field spanning several columns, e.g. --group status,substatus
    #[arg(long)]
    group: Vec<String>,
}

fn main() -> Result<()> {
    anomalog::init();
    let args = Args::parse();
    let data = Dataset::open(&args.input)?;
    let compounds = args
        .group
        .iter()
        .map(|g| g.split(',').map(str::trim).collect::<Vec<&str>>())
        .collect::<Vec<_>>();
    let taken = compounds
        .iter()
        .flatten()
        .copied()
        .collect::<HashSet<&str>>();
    let mut fields = compounds.clone();
    for name in data.names() {
        if !taken.contains(name.as_str()) {
            fields.push(vec![name.as_str()]);
        }
    }
    let (ref table, ref codebook) = data.compound(&fields)?;
    let config = Config {
        max_level: args.max_level,
        t_alpha: args.t_alpha,
        firsts_n: args.firsts_n,
        threshold: match args.mu {
            Some(mu) => Threshold::Fixed(mu),
            None => Threshold::Elbow {
                prominence: args.prominence,
                separation: None,
            },
        },
    };
    let analysis = Analysis::new(table, config)?;
    let source = args.input.display().to_string();
    let report = analysis.report(&source, "", codebook);
    report.save(&args.output)?;
    log::info!("{:<32}{:<32}", "report written", args.output.display());
    Ok(())
}
