// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use swingchart::config::Settings;
use swingchart::util::{filename_display, ms_minutes_seconds};
use swingchart::{output, transform, Chart, Direction};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Converts rhythm game charts between straight and swing timing."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

/// Which way to convert a chart.
#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    /// Convert from swing if the file name contains the swing marker, to swing otherwise.
    Auto,
    /// Convert straight timing to swing timing.
    ToSwing,
    /// Convert swing timing back to straight timing.
    FromSwing,
}

#[derive(Subcommand)]
enum Commands {
    /// Converts a chart and writes the converted copy.
    Convert {
        /// The path to the chart to convert.
        input: PathBuf,
        /// The direction to convert in.
        #[arg(short, long, value_enum, default_value_t = DirectionArg::Auto)]
        direction: DirectionArg,
        /// Where to write the converted chart. Defaults to <song>-swing.json or
        /// <song>-non-swing.json in the configured output directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// The path to a settings file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Prints a chart's tempo regions.
    Inspect {
        /// The path to the chart to inspect.
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            direction,
            output,
            config,
        } => {
            let settings = Settings::load(config.as_deref())?;
            let direction = match direction {
                DirectionArg::Auto => {
                    let detected =
                        Direction::detect(filename_display(&input), &settings.swing_marker);
                    info!(
                        file = filename_display(&input),
                        direction = %detected,
                        "Detected conversion direction."
                    );
                    detected
                }
                DirectionArg::ToSwing => Direction::ToSwing,
                DirectionArg::FromSwing => Direction::FromSwing,
            };

            let chart = Chart::load(&input)?;
            let converted = transform(&chart, direction)?;

            let path = output
                .unwrap_or_else(|| output::default_output_path(&converted, direction, &settings));
            output::save(&converted, &path, settings.pretty)?;
            println!("Saved under the name '{}'.", path.display());
        }
        Commands::Inspect { input } => {
            let chart = Chart::load(&input)?;
            let log = swingchart::transform::tempo_log(&chart)?;

            println!("Song: {} ({})", chart.song.name, chart.song_name());
            println!("Base BPM: {}", chart.base_bpm());
            println!(
                "Sections: {}, notes: {}",
                chart.song.sections.len(),
                chart.note_count()
            );
            println!("\nTempo regions (count: {}):", log.region_count());
            for (start_ms, region) in log.region_start_times() {
                println!(
                    "- {} BPM from section {} ({})",
                    region.bpm,
                    region.start_index,
                    ms_minutes_seconds(start_ms)
                );
            }
        }
    }

    Ok(())
}
