use crate::{Outcome, Problem, Solver};
use nlopt::{Algorithm, FailState, Nlopt, SuccessState, Target};
use std::time::Duration;
use tracing::{Level, event};

/// A solver implementation that uses the SLSQP (sequential least-squares
/// quadratic programming) routine of the NLopt library.
///
/// NLopt receives the negated utility as the objective and the budget as an
/// equality constraint, both with their analytic gradients, and starts from the
/// equal-split guess. Lower bounds a hair above zero keep the iterates inside
/// the consumption set, where the objective is defined.
///
/// The final iterate is returned unmodified whether or not NLopt converged.
pub struct NloptSolver(NloptSettings);

/// Configuration for [`NloptSolver`]
#[derive(Clone, Debug)]
pub struct NloptSettings {
    /// Stop once a step changes every coordinate by less than this, relatively
    pub xtol_rel: f64,
    /// The maximum number of objective evaluations
    pub max_eval: u32,
    /// Wall-clock limit for a solve (if omitted, no limit)
    pub time_limit: Option<Duration>,
    /// Tolerance on the budget equality
    pub constraint_tolerance: f64,
    /// Lower bound on each good, as a fraction of the most that is affordable
    pub floor: f64,
}

impl Default for NloptSettings {
    fn default() -> Self {
        Self {
            xtol_rel: 1e-10,
            max_eval: 500,
            time_limit: None,
            constraint_tolerance: 1e-9,
            floor: 1e-9,
        }
    }
}

impl Default for NloptSolver {
    fn default() -> Self {
        Self(NloptSettings::default())
    }
}

/// Diagnostics reported alongside an NLopt solve
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NloptData {
    /// The termination state, as reported by NLopt
    pub status: String,
    /// The objective (negated utility) at the final iterate
    pub objective: f64,
}

fn objective(x: &[f64], gradient: Option<&mut [f64]>, problem: &mut Problem) -> f64 {
    let x = [x[0], x[1]];
    if let Some(gradient) = gradient {
        gradient.copy_from_slice(&problem.objective_gradient(&x));
    }
    problem.objective(&x)
}

fn budget(x: &[f64], gradient: Option<&mut [f64]>, problem: &mut Problem) -> f64 {
    if let Some(gradient) = gradient {
        gradient.copy_from_slice(&problem.constraint_gradient());
    }
    problem.constraint(&[x[0], x[1]])
}

fn setup(result: Result<SuccessState, FailState>) -> Result<(), NloptError> {
    result.map(|_| ()).map_err(NloptError::Setup)
}

impl Solver for NloptSolver {
    type Settings = NloptSettings;
    type Error = NloptError;
    type Data = NloptData;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn solve(&self, problem: &Problem) -> Result<Outcome<Self::Data>, Self::Error> {
        let settings = &self.0;
        let mut x = problem.initial_guess();

        // With zero income the origin is the only affordable bundle, and the
        // positive lower bounds would make the problem infeasible
        if problem.budget.income() == 0.0 {
            return Ok(Outcome {
                x0: x[0],
                x1: x[1],
                converged: true,
                data: NloptData {
                    status: "ZeroIncome".to_owned(),
                    objective: 0.0,
                },
            });
        }

        let mut opt = Nlopt::new(Algorithm::Slsqp, 2, objective, Target::Minimize, *problem);
        setup(opt.add_equality_constraint(budget, *problem, settings.constraint_tolerance))?;
        setup(opt.set_lower_bounds(&[
            settings.floor * problem.budget.max_x0(),
            settings.floor * problem.budget.income(),
        ]))?;
        setup(opt.set_xtol_rel(settings.xtol_rel))?;
        setup(opt.set_maxeval(settings.max_eval))?;
        if let Some(limit) = settings.time_limit {
            setup(opt.set_maxtime(limit.as_secs_f64()))?;
        }

        let (status, converged, value) = match opt.optimize(&mut x) {
            Ok((state, value)) => (
                format!("{state:?}"),
                !matches!(
                    state,
                    SuccessState::MaxEvalReached | SuccessState::MaxTimeReached
                ),
                value,
            ),
            Err((FailState::InvalidArgs, _)) => {
                return Err(NloptError::Setup(FailState::InvalidArgs));
            }
            Err((state, value)) => (format!("{state:?}"), false, value),
        };

        event!(
            Level::DEBUG,
            status,
            x0 = x[0],
            x1 = x[1],
            residual = problem.constraint(&x),
            "nlopt solve finished"
        );
        if !converged {
            event!(Level::WARN, status, "nlopt did not converge");
        }

        Ok(Outcome {
            x0: x[0],
            x1: x[1],
            converged,
            data: NloptData {
                status,
                objective: value,
            },
        })
    }
}

/// Errors raised while handing the problem to NLopt
#[derive(Debug, thiserror::Error)]
pub enum NloptError {
    /// NLopt rejected the algorithm, bounds, constraint or stopping criteria
    #[error("NLopt rejected the problem setup: {0:?}")]
    Setup(FailState),
}
