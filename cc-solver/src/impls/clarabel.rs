use crate::{Outcome, Problem, Solver};
use clarabel::{algebra::*, solver::*};
use std::time::Duration;
use tracing::{Level, event};

/// A solver implementation that uses the Clarabel interior point solver.
///
/// Cobb-Douglas utility is exactly representable with the power cone
/// `K(a) = {(u, v, w) : u^a v^(1-a) >= |w|, u, v >= 0}`, so the consumer's
/// problem becomes the conic program
///
/// ```text
/// minimize    -t
/// subject to  p x0 + x1 = m
///             (x0, x1, t) in K(a)
/// ```
///
/// Interior point methods do not accept an initial guess; the solver starts
/// from its own central point.
pub struct ClarabelSolver(DefaultSettings<f64>);

impl Default for ClarabelSolver {
    fn default() -> Self {
        let mut settings = DefaultSettings::default();
        settings.verbose = false;
        // Utility is flat near the optimum, so the bundle is only accurate to
        // roughly the square root of the duality gap
        settings.tol_gap_abs = 1e-11;
        settings.tol_gap_rel = 1e-11;
        settings.tol_feas = 1e-10;
        Self(settings)
    }
}

impl ClarabelSolver {
    /// Stop the interior point iterations once `limit` has elapsed. By default
    /// there is no limit.
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.0.time_limit = limit.as_secs_f64();
        self
    }
}

/// Diagnostics reported alongside a Clarabel solve
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClarabelData {
    /// The termination status, as reported by Clarabel
    pub status: String,
    /// The number of interior point iterations taken
    pub iterations: u32,
}

impl Solver for ClarabelSolver {
    type Settings = DefaultSettings<f64>;
    type Error = ClarabelError;
    type Data = ClarabelData;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn solve(&self, problem: &Problem) -> Result<Outcome<Self::Data>, Self::Error> {
        let price = problem.budget.price();
        let income = problem.budget.income();
        let share = problem.preferences.share();

        // The decision variables are (x0, x1, t); only t enters the objective,
        // which is linear, so the quadratic term is empty.
        let p_matrix = CscMatrix {
            m: 3,
            n: 3,
            colptr: vec![0; 4],
            rowval: Vec::new(),
            nzval: Vec::new(),
        };
        let q = vec![0.0, 0.0, -1.0];

        // Clarabel handles constraints as Ax + s = b, where s lies in a product of cones.
        // Row 0 is the budget (s = 0), rows 1..=3 place s = (x0, x1, t) in the power cone.
        // The matrix is CSC, so we lay it out column by column.
        let a_matrix = CscMatrix {
            m: 4,
            n: 3,
            colptr: vec![0, 2, 4, 5],
            rowval: vec![0, 1, 0, 2, 3],
            nzval: vec![price, -1.0, 1.0, -1.0, -1.0],
        };
        let b = vec![income, 0.0, 0.0, 0.0];
        let cones = vec![ZeroConeT(1), PowerConeT(share)];

        // Now we can solve!
        let mut solver = DefaultSolver::new(&p_matrix, &q, &a_matrix, &b, &cones, self.0.clone())?;
        solver.solve();

        let solution = &solver.solution;
        let status = solution.status.clone();
        let converged = matches!(status, SolverStatus::Solved | SolverStatus::AlmostSolved);

        event!(
            Level::DEBUG,
            ?status,
            iterations = solution.iterations,
            x0 = solution.x[0],
            x1 = solution.x[1],
            "clarabel solve finished"
        );
        if !converged {
            event!(Level::WARN, ?status, "clarabel did not converge");
        }

        Ok(Outcome {
            x0: solution.x[0],
            x1: solution.x[1],
            converged,
            data: ClarabelData {
                status: format!("{status:?}"),
                iterations: solution.iterations,
            },
        })
    }
}

/// Errors raised while handing the problem to Clarabel
#[derive(Debug, thiserror::Error)]
pub enum ClarabelError {
    /// Clarabel rejected the problem dimensions or the settings
    #[error("Clarabel rejected the problem: {0}")]
    Setup(#[from] SolverError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cc_core::models::{Budget, Preferences};
    use rstest::rstest;

    fn problem(price: f64, income: f64, share: f64) -> Problem {
        Problem::new(
            Budget::new(price, income).unwrap(),
            Preferences::new(share).unwrap(),
        )
    }

    #[test]
    fn test_status_is_reported() {
        let problem = problem(1.0, 100.0, 0.4);
        let outcome = ClarabelSolver::default().solve(&problem).unwrap();

        assert!(outcome.converged);
        assert!(matches!(outcome.data.status.as_str(), "Solved" | "AlmostSolved"));
        assert!(outcome.data.iterations > 0);
    }

    // Cheap good 0 and high income put the optimum far from the origin, where
    // the default gap tolerance leaves the bundle visibly off
    #[rstest]
    #[case(0.2, 200.0, 0.4)]
    #[case(0.2, 200.0, 0.9)]
    #[case(0.2, 150.0, 0.6)]
    #[case(0.5, 200.0, 0.9)]
    fn test_matches_closed_form_far_from_origin(
        #[case] price: f64,
        #[case] income: f64,
        #[case] share: f64,
    ) {
        let p = problem(price, income, share);
        let expected = p.closed_form();
        let outcome = ClarabelSolver::default().solve(&p).unwrap();

        assert!(outcome.converged);
        assert_abs_diff_eq!(outcome.x0, expected.bundle.x0(), epsilon = 1e-2);
        assert_abs_diff_eq!(outcome.x1, expected.bundle.x1(), epsilon = 1e-2);
    }

    #[test]
    fn test_rejected_settings_are_an_error() {
        let mut settings = DefaultSettings::default();
        settings.verbose = false;
        settings.direct_solve_method = "no-such-method".to_owned();

        let result = ClarabelSolver::new(settings).solve(&problem(1.0, 100.0, 0.4));
        assert!(matches!(result, Err(ClarabelError::Setup(_))));
    }
}
