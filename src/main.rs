use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(name = "inner-zoom")]
#[command(version, about = "Replay zoom widget interactions and print one JSON frame per step", long_about = None)]
struct Cli {
    /// Scenario file with config, sources, layout and steps
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    inner_zoom::run(&cli.scenario)
        .with_context(|| format!("failed to replay {}", cli.scenario.display()))
}
