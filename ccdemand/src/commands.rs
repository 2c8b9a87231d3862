use super::{IOArgs, OutputArgs};
use cc_core::{
    models::{Budget, Preferences},
    ports::Problem,
};
use clap::{Args, Subcommand};

pub mod demand;
pub mod explore;
pub mod plot;
pub mod schema;
pub mod solve;

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the closed-form (Marshallian) demand
    Demand {
        #[command(flatten)]
        market: MarketArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Solve scenarios numerically and compare against the closed form
    Solve {
        #[command(flatten)]
        io: IOArgs,

        /// Request a specific solver
        #[arg(short, long, default_value = "clarabel")]
        lib: solve::SolverLib,
    },

    /// Render the budget-line diagram to SVG
    Plot {
        #[command(flatten)]
        market: MarketArgs,

        /// Evaluate the bundle on the budget line with this much of good 0
        /// and annotate the arbitrage comparison, instead of plotting the optimum
        #[arg(long)]
        x0: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Replay slider events, re-rendering the diagram after each change
    Explore {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Print the JSON schemas of the scenario and report formats
    Schema {
        #[command(flatten)]
        output: OutputArgs,
    },
}

// Prices, income and preferences, as given on the command line
#[derive(Args)]
pub struct MarketArgs {
    /// The price of good 0, in units of good 1
    #[arg(short, long, default_value_t = 1.0)]
    price: f64,

    /// The income to be spent
    #[arg(short, long, default_value_t = 100.0)]
    income: f64,

    /// The Cobb-Douglas share parameter (exponent on good 0)
    #[arg(short, long, default_value_t = 0.4)]
    share: f64,
}

impl MarketArgs {
    pub fn problem(&self) -> anyhow::Result<Problem> {
        Ok(Problem::new(
            Budget::new(self.price, self.income)?,
            Preferences::new(self.share)?,
        ))
    }
}
