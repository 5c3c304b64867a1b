//! FARS Map - command line front end
//!
//! `fars_map summary 2013 2014 2015` prints monthly counts;
//! `fars_map plot 1 2013` writes `state_1_2013.png`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fars_map::{logging, plot_state, summarize, FarsConfig, PlotOutcome};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "fars_map", version, about = "FARS accident summaries and state maps")]
struct Cli {
    /// JSON configuration file
    #[arg(long, default_value = "fars.json")]
    config: PathBuf,

    /// Directory holding accident_<year>.csv.bz2 files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Accident counts per month, one column per year
    Summary {
        #[arg(required = true)]
        years: Vec<i32>,
    },
    /// Scatter map of one state's accidents
    Plot {
        /// STATE code; anything outside the file's codes is rejected
        #[arg(allow_negative_numbers = true)]
        state: i64,
        year: i32,
    },
}

fn main() -> Result<()> {
    logging::init_logging("info");

    let cli = Cli::parse();
    let mut config = FarsConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let dataset = config.dataset();

    match cli.command {
        Command::Summary { years } => {
            let pivot = summarize(&dataset, &years).context("summarizing years")?;
            print!("{pivot}");
        }
        Command::Plot { state, year } => {
            let mut renderer = config.renderer().context("preparing renderer")?;
            match plot_state(&dataset, state, year, &mut renderer)? {
                PlotOutcome::NoAccidents => {}
                PlotOutcome::Rendered { points } => {
                    if let Some(path) = renderer.written().last() {
                        info!("{} points -> {}", points, path.display());
                    }
                }
            }
        }
    }

    Ok(())
}
