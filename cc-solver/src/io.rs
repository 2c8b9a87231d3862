use crate::{Outcome, Problem, Solver};
use cc_core::models::{Arbitrage, Budget, Demand, Preferences};
use serde::{Deserialize, Serialize};

/// A named consumer problem, as read from JSON.
///
/// ```json
/// { "name": "reference", "budget": { "price": 1.0, "income": 100.0 }, "preferences": 0.4 }
/// ```
///
/// Validation of the budget and preferences happens during deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Scenario {
    /// An optional label, carried through to the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Prices and income
    pub budget: Budget,
    /// The share parameter of the utility function
    pub preferences: Preferences,
}

/// The comparison of a numerical solve against the closed-form demand
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Report<Data> {
    /// The scenario label, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The analytical optimum
    pub closed_form: Demand,
    /// The solver's final iterate and diagnostics
    pub numeric: Outcome<Data>,
    /// Utility at the solver's iterate (NaN if it left the consumption set)
    pub numeric_utility: f64,
    /// The larger of the absolute deviations in x0 and x1
    pub max_deviation: f64,
    /// The budget violation at the solver's iterate
    pub residual: f64,
    /// The no-arbitrage check at the solver's iterate, when it is interior
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arbitrage: Option<Arbitrage>,
}

impl Scenario {
    /// The underlying optimization problem
    pub fn problem(&self) -> Problem {
        Problem::new(self.budget, self.preferences)
    }

    /// Solve the scenario numerically and compare with the closed form
    pub fn solve<T: Solver>(&self, solver: &T) -> Result<Report<T::Data>, T::Error> {
        let problem = self.problem();
        let closed_form = problem.closed_form();
        let numeric = solver.solve(&problem)?;

        let max_deviation = (numeric.x0 - closed_form.bundle.x0())
            .abs()
            .max((numeric.x1 - closed_form.bundle.x1()).abs());

        // Arbitrage is tested with a loose tolerance, as the iterate is only
        // approximately optimal
        let arbitrage = numeric.bundle().ok().and_then(|bundle| {
            Arbitrage::with_tolerance(&bundle, &self.budget, &self.preferences, 1e-4).ok()
        });

        Ok(Report {
            name: self.name.clone(),
            closed_form,
            numeric_utility: numeric.utility(&problem),
            max_deviation,
            residual: numeric.residual(&problem),
            arbitrage,
            numeric,
        })
    }
}

impl<Data> Report<Data> {
    /// Whether the solver converged and agrees with the closed form to within `tolerance`
    pub fn agrees(&self, tolerance: f64) -> bool {
        self.numeric.converged && self.max_deviation <= tolerance
    }
}
