#![allow(unused_macros)]
use rstest_reuse::template;

// This creates a testing "template" to allow for the injection of each solver
// implementation

#[template]
#[rstest]
#[case::clarabel(cc_solver::clarabel::ClarabelSolver::default())]
#[case::nlopt(cc_solver::nlopt::NloptSolver::default())]
pub fn all_solvers(#[case] solver: impl cc_solver::Solver) -> () {}
