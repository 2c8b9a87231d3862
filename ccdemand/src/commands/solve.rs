use crate::SolverConfig;
use cc_solver::{
    Solver,
    clarabel::ClarabelSolver,
    io::{Report, Scenario},
    nlopt::{NloptSettings, NloptSolver},
};
use clap::ValueEnum;
use serde::Deserialize;
use std::io::{Read, Write};
use tracing::{Level, event};

// Agreement with the closed form that is worth a warning when missed
const AGREEMENT: f64 = 1e-2;

// This explicitly articulates the available solvers for the `solve` subcommand
#[derive(Clone, Copy, ValueEnum)]
pub enum SolverLib {
    Clarabel,
    Nlopt,
}

// A scenario file holds either one scenario or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    One(Scenario),
    Many(Vec<Scenario>),
}

pub fn read_scenarios(input: impl Read) -> anyhow::Result<Vec<Scenario>> {
    Ok(match serde_json::from_reader(input)? {
        ScenarioFile::One(scenario) => vec![scenario],
        ScenarioFile::Many(scenarios) => scenarios,
    })
}

// Conveniently, we can use the same enum to handle the particulars of calling into
// the various solver implementations
impl SolverLib {
    pub fn solve(
        &self,
        scenarios: &[Scenario],
        config: &SolverConfig,
        output: impl Write,
    ) -> anyhow::Result<()> {
        match self {
            SolverLib::Clarabel => {
                let mut solver = ClarabelSolver::default();
                if let Some(limit) = config.time_limit {
                    solver = solver.time_limit(limit);
                }
                let reports = scenarios
                    .iter()
                    .map(|scenario| scenario.solve(&solver))
                    .collect::<Result<Vec<_>, _>>()?;
                check(&reports);
                serde_json::to_writer_pretty(output, &reports)?;
            }
            SolverLib::Nlopt => {
                let solver = NloptSolver::new(NloptSettings {
                    max_eval: config.max_eval,
                    xtol_rel: config.tolerance,
                    time_limit: config.time_limit,
                    ..Default::default()
                });
                let reports = scenarios
                    .iter()
                    .map(|scenario| scenario.solve(&solver))
                    .collect::<Result<Vec<_>, _>>()?;
                check(&reports);
                serde_json::to_writer_pretty(output, &reports)?;
            }
        }
        Ok(())
    }
}

fn check<Data>(reports: &[Report<Data>]) {
    for (i, report) in reports.iter().enumerate() {
        let name = report.name.as_deref().unwrap_or("unnamed");
        if report.agrees(AGREEMENT) {
            event!(
                Level::INFO,
                scenario = i,
                name,
                deviation = report.max_deviation,
                "solver agrees with closed form"
            );
        } else {
            event!(
                Level::WARN,
                scenario = i,
                name,
                converged = report.numeric.converged,
                deviation = report.max_deviation,
                residual = report.residual,
                "solver disagrees with closed form"
            );
        }
    }
}
