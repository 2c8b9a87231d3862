mod arbitrage;
mod budget;
mod bundle;
mod demand;
mod preferences;

pub use arbitrage::{Arbitrage, Relation};
pub use budget::{Budget, BudgetDto, BudgetError};
pub use bundle::{Bundle, BundleDto, BundleError};
pub use demand::{Demand, closed_form_demand};
pub use preferences::{Preferences, PreferencesError, UtilityError};
