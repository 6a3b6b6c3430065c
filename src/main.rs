mod analysis;
mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use fracpaq::read_map;
use tracing::info;

use analysis::run_analysis;
use cli::{init_logger, Cli};
use report::render_summary;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // Flags win over the config file; both are validated before any file is read.
    let config = cli.resolve_config()?;

    // Segment files become one trace per line; polyline files keep their vertices so
    // node counts and trace midpoints are meaningful.
    let map = read_map(&cli.input, cli.traces)
        .with_context(|| format!("loading traces from {}", cli.input.display()))?;
    info!(
        traces = map.trace_count(),
        segments = map.segment_count(),
        "loaded trace map"
    );

    // Statistics, the stress projection and the requested rose all work on the same
    // flattened segment list.
    let summary = run_analysis(&map, &config, cli.rose).context("stress analysis failed")?;

    // JSON carries every number in the summary; the text report lists only occupied
    // rose sectors.
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary));
    }

    Ok(())
}
