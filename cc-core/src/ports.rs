mod solver;

pub use solver::{Outcome, Problem, Solver};
