use crate::models::{Budget, Bundle, BundleError, Demand, Preferences, closed_form_demand};

/// A consumer's utility maximization problem: maximize `u(x0, x1)` subject to
/// `price * x0 + x1 = income`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Problem {
    /// Prices and income
    pub budget: Budget,
    /// The share parameter of the utility function
    pub preferences: Preferences,
}

impl Problem {
    /// Create a new problem
    pub fn new(budget: Budget, preferences: Preferences) -> Self {
        Self {
            budget,
            preferences,
        }
    }

    /// The starting point for iterative solvers: half of income spent on each
    /// good, `(income / (2 * price), income / 2)`.
    pub fn initial_guess(&self) -> [f64; 2] {
        let m = self.budget.income();
        [m / (2.0 * self.budget.price()), m / 2.0]
    }

    /// The negated utility, to be minimized.
    ///
    /// Unlike [`Preferences::utility`], this accepts arbitrary iterates and
    /// returns NaN outside the consumption set, as the raw power functions do.
    pub fn objective(&self, x: &[f64; 2]) -> f64 {
        let a = self.preferences.share();
        -(x[0].powf(a) * x[1].powf(1.0 - a))
    }

    /// The gradient of [`Problem::objective`], `-(a u / x0, (1 - a) u / x1)`
    pub fn objective_gradient(&self, x: &[f64; 2]) -> [f64; 2] {
        let a = self.preferences.share();
        let u = -self.objective(x);
        [-a * u / x[0], -(1.0 - a) * u / x[1]]
    }

    /// The budget equality in the form `g(x) = price * x0 + x1 - income = 0`
    pub fn constraint(&self, x: &[f64; 2]) -> f64 {
        self.budget.price() * x[0] + x[1] - self.budget.income()
    }

    /// The gradient of [`Problem::constraint`], which is constant
    pub fn constraint_gradient(&self) -> [f64; 2] {
        [self.budget.price(), 1.0]
    }

    /// The analytical solution, against which numerical outcomes are compared
    pub fn closed_form(&self) -> Demand {
        closed_form_demand(&self.budget, &self.preferences)
    }
}

/// The raw result of a numerical solve.
///
/// The iterate is reported exactly as the solver produced it, even when the
/// solver did not converge; it may therefore violate the budget or lie outside
/// the consumption set.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome<Data> {
    /// The final iterate for good 0
    pub x0: f64,

    /// The final iterate for good 1
    pub x1: f64,

    /// Whether the underlying solver reported success
    pub converged: bool,

    /// Additional solver-specific data, such as a status or iteration count
    pub data: Data,
}

impl<Data> Outcome<Data> {
    /// The iterate as an array
    pub fn x(&self) -> [f64; 2] {
        [self.x0, self.x1]
    }

    /// The iterate as a validated bundle, if it lies in the consumption set
    pub fn bundle(&self) -> Result<Bundle, BundleError> {
        Bundle::new(self.x0, self.x1)
    }

    /// The utility at the iterate (NaN outside the consumption set)
    pub fn utility(&self, problem: &Problem) -> f64 {
        -problem.objective(&self.x())
    }

    /// The violation of the budget equality at the iterate
    pub fn residual(&self, problem: &Problem) -> f64 {
        problem.constraint(&self.x())
    }
}

/// Interface for numerical solvers of the consumer's problem.
///
/// Implementations wrap a general-purpose optimization library. They supply
/// the objective, the budget equality and (where the library accepts one) the
/// initial guess, and report the library's final iterate.
pub trait Solver {
    /// The configuration type for this solver
    type Settings;

    /// Error type for failures to set up the problem. A solve that runs but
    /// does not converge is not an error; see [`Outcome::converged`].
    type Error: std::error::Error;

    /// Solver-specific data attached to every outcome
    type Data;

    /// Create a new instance with the provided settings
    fn new(settings: Self::Settings) -> Self;

    /// Solve the consumer's problem
    fn solve(&self, problem: &Problem) -> Result<Outcome<Self::Data>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn problem(price: f64, income: f64, share: f64) -> Problem {
        Problem::new(
            Budget::new(price, income).unwrap(),
            Preferences::new(share).unwrap(),
        )
    }

    #[test]
    fn test_initial_guess_is_feasible() {
        let p = problem(0.5, 120.0, 0.3);
        let guess = p.initial_guess();
        assert_eq!(guess, [120.0, 60.0]);
        assert_abs_diff_eq!(p.constraint(&guess), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_objective_matches_utility() {
        let p = problem(1.0, 100.0, 0.4);
        let demand = p.closed_form();
        let x = [demand.bundle.x0(), demand.bundle.x1()];
        assert_abs_diff_eq!(-p.objective(&x), demand.utility, epsilon = 1e-12);
        assert!(p.objective(&[-1.0, 10.0]).is_nan());
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        let p = problem(0.8, 90.0, 0.35);
        let x = [30.0, 50.0];
        let h = 1e-6;

        let grad = p.objective_gradient(&x);
        let d0 = (p.objective(&[x[0] + h, x[1]]) - p.objective(&[x[0] - h, x[1]])) / (2.0 * h);
        let d1 = (p.objective(&[x[0], x[1] + h]) - p.objective(&[x[0], x[1] - h])) / (2.0 * h);
        assert_abs_diff_eq!(grad[0], d0, epsilon = 1e-6);
        assert_abs_diff_eq!(grad[1], d1, epsilon = 1e-6);

        let g = p.constraint_gradient();
        assert_abs_diff_eq!(p.constraint(&[x[0] + 1.0, x[1]]) - p.constraint(&x), g[0], epsilon = 1e-12);
        assert_eq!(g[1], 1.0);
    }

    #[test]
    fn test_outcome_accessors() {
        let p = problem(1.0, 100.0, 0.4);
        let outcome = Outcome {
            x0: 40.0,
            x1: 61.0,
            converged: false,
            data: (),
        };
        assert_abs_diff_eq!(outcome.residual(&p), 1.0, epsilon = 1e-12);
        assert!(outcome.bundle().is_ok());

        let infeasible = Outcome {
            x0: -1.0,
            x1: 101.0,
            converged: false,
            data: (),
        };
        assert!(infeasible.bundle().is_err());
        assert!(infeasible.utility(&p).is_nan());
    }
}
