use super::{Budget, Bundle, Preferences};

/// The utility-maximizing bundle for a budget, together with its utility.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demand {
    /// The optimal bundle
    pub bundle: Bundle,
    /// The utility attained at the optimal bundle
    pub utility: f64,
}

/// The Marshallian demand of Cobb-Douglas preferences:
/// `x0 = a * m / p`, `x1 = (1 - a) * m`.
///
/// This is exact and cannot fail: the validated `Budget` guarantees `p > 0` and
/// `m >= 0`, and the validated `Preferences` guarantee `0 < a < 1`. With zero
/// income the bundle is the origin and the utility is reported as zero, which
/// is the limit of `u` along any path to the origin.
pub fn closed_form_demand(budget: &Budget, preferences: &Preferences) -> Demand {
    let a = preferences.share();
    let m = budget.income();

    let bundle = Bundle::new_unchecked(a * m / budget.price(), (1.0 - a) * m);
    let utility = preferences.utility(&bundle).unwrap_or(0.0);

    Demand { bundle, utility }
}
