#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core domain models for consumer choice.
///
/// This module contains the value types of the problem (bundles, preferences,
/// budgets) together with the closed-form mathematics that operates on them:
/// utility, marginal utilities, the budget line, indifference curves and the
/// Marshallian demand.
///
/// Every type here is an immutable value. Constructors validate their inputs,
/// so a `Bundle`, `Preferences` or `Budget` in hand is always well-formed.
pub mod models;

/// Interface traits for numerical solvers.
///
/// The closed-form demand in [`models`] is the ground truth; implementations
/// of [`ports::Solver`] recover the same optimum numerically so that the two
/// can be compared.
pub mod ports;
