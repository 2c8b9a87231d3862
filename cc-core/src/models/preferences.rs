use super::Bundle;

/// Cobb-Douglas preferences, `u(x0, x1) = x0^a * x1^(1-a)`.
///
/// The share parameter `a` must lie in the open interval (0, 1). It is the
/// exponent on good 0 and, at the optimum, the fraction of income spent on
/// good 0.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Preferences(f64);

impl Preferences {
    /// Creates new preferences from the share parameter
    pub fn new(share: f64) -> Result<Self, PreferencesError> {
        Self::try_from(share)
    }

    /// The exponent on good 0
    pub fn share(&self) -> f64 {
        self.0
    }

    /// The exponent on good 1, `1 - share`
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }

    /// Utility of a bundle, `x0^a * x1^(1-a)`.
    ///
    /// # Errors
    ///
    /// Fails if either quantity is zero; the marginal utilities are not
    /// defined on the boundary of the consumption set.
    pub fn utility(&self, bundle: &Bundle) -> Result<f64, UtilityError> {
        if !bundle.is_interior() {
            return Err(UtilityError::NonPositiveQuantity);
        }
        Ok(bundle.x0().powf(self.share()) * bundle.x1().powf(self.complement()))
    }

    /// Marginal utility of good 0, `a * u / x0`
    pub fn marginal_utility_good0(&self, bundle: &Bundle) -> Result<f64, UtilityError> {
        Ok(self.share() * self.utility(bundle)? / bundle.x0())
    }

    /// Marginal utility of good 1, `(1 - a) * u / x1`
    pub fn marginal_utility_good1(&self, bundle: &Bundle) -> Result<f64, UtilityError> {
        Ok(self.complement() * self.utility(bundle)? / bundle.x1())
    }

    /// Marginal rate of substitution, `MU0 / MU1`
    pub fn marginal_rate_of_substitution(&self, bundle: &Bundle) -> Result<f64, UtilityError> {
        Ok(self.marginal_utility_good0(bundle)? / self.marginal_utility_good1(bundle)?)
    }

    /// The quantity of good 1 that, paired with `x0` units of good 0, yields
    /// the target utility: `(target / x0^a)^(1 / (1 - a))`.
    ///
    /// # Errors
    ///
    /// Fails if `x0` is not strictly positive or the target is negative (or
    /// either is not finite).
    pub fn indifference_curve(&self, x0: f64, target: f64) -> Result<f64, UtilityError> {
        if !x0.is_finite() || x0 <= 0.0 {
            return Err(UtilityError::NonPositiveQuantity);
        }
        if !target.is_finite() || target < 0.0 {
            return Err(UtilityError::InvalidTarget);
        }
        Ok((target / x0.powf(self.share())).powf(1.0 / self.complement()))
    }
}

impl From<Preferences> for f64 {
    fn from(value: Preferences) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Preferences {
    type Error = PreferencesError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_nan() {
            Err(PreferencesError::NaN)
        } else if value <= 0.0 || value >= 1.0 {
            Err(PreferencesError::OutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }
}

/// Errors that can occur when creating Preferences
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PreferencesError {
    /// Error when the share parameter is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when the share parameter is outside (0, 1)
    #[error("Share parameter {0} is outside the open interval (0, 1)")]
    OutOfRange(f64),
}

/// Errors that can occur when evaluating utility or indifference curves
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum UtilityError {
    /// Error when a quantity is zero (or, for curves, not strictly positive)
    #[error("Utility is only defined for strictly positive quantities")]
    NonPositiveQuantity,
    /// Error when the target utility is negative or not finite
    #[error("Target utility must be finite and non-negative")]
    InvalidTarget,
}
