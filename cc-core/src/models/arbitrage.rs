use super::{Budget, Bundle, Preferences, UtilityError};
use std::fmt;

/// How the marginal utility per unit of money of good 0 compares to that of
/// good 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Relation {
    /// Good 0 yields more utility per unit of money
    Greater,
    /// Good 1 yields more utility per unit of money
    Less,
    /// The tangency condition holds
    Equal,
}

impl Relation {
    /// The relation as a comparison operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::Less => "<",
            Self::Equal => "=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbol().fmt(f)
    }
}

/// The no-arbitrage check for a bundle: `MU0 / p0` versus `MU1 / p1`.
///
/// Good 1 is the numeraire, so `p1 = 1`. Whenever the two sides differ the
/// consumer can raise utility by moving spending toward the good with the
/// larger ratio; at the optimum they coincide.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arbitrage {
    /// Marginal utility of good 0 divided by its price
    pub mu0_per_price: f64,
    /// Marginal utility of good 1 divided by its (unit) price
    pub mu1_per_price: f64,
    /// The comparison between the two
    pub relation: Relation,
}

impl Arbitrage {
    /// Relative tolerance used by [`Arbitrage::evaluate`] to decide equality
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    /// Compare marginal utilities per price at `bundle`
    pub fn evaluate(
        bundle: &Bundle,
        budget: &Budget,
        preferences: &Preferences,
    ) -> Result<Self, UtilityError> {
        Self::with_tolerance(bundle, budget, preferences, Self::DEFAULT_TOLERANCE)
    }

    /// Compare marginal utilities per price at `bundle`, treating the two as
    /// equal when they differ by at most `tolerance` relative to the larger
    pub fn with_tolerance(
        bundle: &Bundle,
        budget: &Budget,
        preferences: &Preferences,
        tolerance: f64,
    ) -> Result<Self, UtilityError> {
        let mu0_per_price = preferences.marginal_utility_good0(bundle)? / budget.price();
        let mu1_per_price = preferences.marginal_utility_good1(bundle)?;

        let scale = mu0_per_price.abs().max(mu1_per_price.abs());
        let relation = if (mu0_per_price - mu1_per_price).abs() <= tolerance * scale {
            Relation::Equal
        } else if mu0_per_price > mu1_per_price {
            Relation::Greater
        } else {
            Relation::Less
        };

        Ok(Self {
            mu0_per_price,
            mu1_per_price,
            relation,
        })
    }

    /// Whether the tangency condition holds
    pub fn is_optimal(&self) -> bool {
        self.relation == Relation::Equal
    }

    /// A short description of the reallocation that raises utility
    pub fn advice(&self) -> &'static str {
        match self.relation {
            Relation::Greater => "shift spending toward good 0",
            Relation::Less => "shift spending toward good 1",
            Relation::Equal => "no gain from reallocating",
        }
    }
}

impl fmt::Display for Arbitrage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MU0/p0 = {:.4} {} MU1/p1 = {:.4}",
            self.mu0_per_price, self.relation, self.mu1_per_price
        )
    }
}
