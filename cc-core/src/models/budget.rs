use super::{Bundle, BundleError};

/// Prices and income faced by the consumer.
///
/// Good 1 is the numeraire, so only the relative price of good 0 is needed.
/// The budget constraint is `price * x0 + x1 = income`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BudgetDto", into = "BudgetDto")
)]
pub struct Budget {
    price: f64,
    income: f64,
}

impl Budget {
    /// Creates a new budget, validating that the price is positive and the
    /// income non-negative (both finite)
    pub fn new(price: f64, income: f64) -> Result<Self, BudgetError> {
        Self::try_from(BudgetDto { price, income })
    }

    /// The price of good 0, in units of good 1
    pub fn price(&self) -> f64 {
        self.price
    }

    /// The income to be spent
    pub fn income(&self) -> f64 {
        self.income
    }

    /// The quantity of good 1 that exhausts income given `x0` units of good 0.
    ///
    /// This is linear and decreasing in `x0`, with slope `-price`. No clipping
    /// is applied: past the horizontal intercept the value is negative.
    pub fn budget_line(&self, x0: f64) -> f64 {
        self.income - self.price * x0
    }

    /// The largest affordable quantity of good 0 (the horizontal intercept)
    pub fn max_x0(&self) -> f64 {
        self.income / self.price
    }

    /// The cost of a bundle at these prices
    pub fn cost(&self, bundle: &Bundle) -> f64 {
        self.price * bundle.x0() + bundle.x1()
    }

    /// The signed violation of the budget equality, `price * x0 + x1 - income`
    pub fn residual(&self, bundle: &Bundle) -> f64 {
        self.cost(bundle) - self.income
    }

    /// The bundle on the budget line with `x0` units of good 0
    pub fn bundle_at(&self, x0: f64) -> Result<Bundle, BundleError> {
        Bundle::new(x0, self.budget_line(x0))
    }

    /// The fraction of income spent on good 0, or `None` for a zero income
    pub fn budget_share(&self, bundle: &Bundle) -> Option<f64> {
        (self.income > 0.0).then(|| self.price * bundle.x0() / self.income)
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetDto {
    /// The price of good 0, in units of good 1
    pub price: f64,
    /// The income to be spent
    pub income: f64,
}

impl From<Budget> for BudgetDto {
    fn from(value: Budget) -> Self {
        Self {
            price: value.price,
            income: value.income,
        }
    }
}

impl TryFrom<BudgetDto> for Budget {
    type Error = BudgetError;

    fn try_from(value: BudgetDto) -> Result<Self, Self::Error> {
        let BudgetDto { price, income } = value;

        if price.is_nan() || income.is_nan() {
            return Err(BudgetError::NaN);
        }
        if price.is_infinite() || income.is_infinite() {
            return Err(BudgetError::Infinity);
        }
        if price <= 0.0 {
            return Err(BudgetError::NonPositivePrice);
        }
        if income < 0.0 {
            return Err(BudgetError::NegativeIncome);
        }

        Ok(Self { price, income })
    }
}

/// Errors that can occur when creating a Budget
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BudgetError {
    /// Error when the price or income is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when the price or income is infinite
    #[error("Price and income cannot be infinite")]
    Infinity,
    /// Error when the price is zero or negative
    #[error("Price must be positive")]
    NonPositivePrice,
    /// Error when the income is negative
    #[error("Income cannot be negative")]
    NegativeIncome,
}
