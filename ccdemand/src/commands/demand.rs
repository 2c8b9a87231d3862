use cc_core::{
    models::{Arbitrage, Budget, Demand, Preferences},
    ports::Problem,
};
use serde::Serialize;

/// The closed-form solution, along with the quantities a student would check
/// it against
#[derive(Debug, Serialize)]
pub struct DemandSummary {
    pub budget: Budget,
    pub preferences: Preferences,
    pub demand: Demand,
    /// Fraction of income spent on good 0 (equals the share parameter)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_share: Option<f64>,
    /// The tangency check at the optimum (absent with zero income)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arbitrage: Option<Arbitrage>,
}

pub fn summarize(problem: &Problem) -> DemandSummary {
    let demand = problem.closed_form();

    DemandSummary {
        budget: problem.budget,
        preferences: problem.preferences,
        budget_share: problem.budget.budget_share(&demand.bundle),
        arbitrage: Arbitrage::evaluate(&demand.bundle, &problem.budget, &problem.preferences)
            .ok(),
        demand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn summary_of_reference() {
        let problem = Problem::new(
            Budget::new(1.0, 100.0).unwrap(),
            Preferences::new(0.4).unwrap(),
        );
        let summary = summarize(&problem);

        assert_abs_diff_eq!(summary.budget_share.unwrap(), 0.4, epsilon = 1e-12);
        assert!(summary.arbitrage.unwrap().is_optimal());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["demand"]["bundle"]["x0"], 40.0);
        assert_eq!(json["preferences"], 0.4);
        assert_eq!(json["arbitrage"]["relation"], "equal");
    }

    #[test]
    fn summary_without_income() {
        let problem = Problem::new(
            Budget::new(1.0, 0.0).unwrap(),
            Preferences::new(0.4).unwrap(),
        );
        let summary = summarize(&problem);
        assert!(summary.budget_share.is_none());
        assert!(summary.arbitrage.is_none());
    }
}
