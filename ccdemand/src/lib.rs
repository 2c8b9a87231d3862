//! Command-line tools for exploring Cobb-Douglas consumer choice.
//!
//! The `ccdemand` binary computes closed-form demands, cross-checks them with
//! numerical solvers, renders budget-line diagrams to SVG, and emulates the
//! slider-driven exploration of the tangency condition by replaying slider
//! events from a file or stdin.

use clap::Parser;
use std::path::PathBuf;

mod io;
pub use io::*;

mod commands;
pub use commands::*;

mod config;
pub use config::{AppConfig, SolverConfig};

mod sliders;
pub use sliders::{Event, ExploreError, Slider, SliderRange, SliderState, Sliders};

/// The top-level arguments: an optional configuration file and the subcommand
/// to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to configuration file
    #[arg(short, long, env = "APP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    /// Execute the subcommand
    pub fn evaluate(self) -> anyhow::Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Demand { market, output } => {
                let summary = demand::summarize(&market.problem()?);
                serde_json::to_writer_pretty(output.write()?, &summary)?;
            }
            Commands::Solve { io, lib } => {
                let scenarios = solve::read_scenarios(io.read()?)?;
                lib.solve(&scenarios, &config.solver, io.write()?)?;
            }
            Commands::Plot { market, x0, output } => {
                let figure = plot::render(&config.plot, &market.problem()?, x0)?;
                plot::write_svg(&figure, output.write()?)?;
            }
            Commands::Explore { io } => {
                let mut explorer = explore::Explorer::new(config.sliders, config.plot)?;
                // A file output always holds the latest frame; stdout receives them all
                let frames = explorer.run(io.read()?, |frame| {
                    plot::write_svg(&frame.figure, io.write()?)
                })?;
                tracing::info!(frames, "exploration finished");
            }
            Commands::Schema { output } => {
                serde_json::to_writer_pretty(output.write()?, &schema::schemas())?;
            }
        }

        Ok(())
    }
}

/// Errors raised by the command-line layer itself
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// The configuration file given on the command line does not exist
    #[error("Config file {0} does not exist")]
    MissingConfig(PathBuf),
}
