#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/**
 * These are implementations of the consumer-choice solver.
 */
mod impls;
pub use impls::*;

/**
 * Scenario input and cross-check reports, intended for use with serde.
 */
#[cfg(feature = "io")]
pub mod io;

pub use cc_core::ports::{Outcome, Problem, Solver};
