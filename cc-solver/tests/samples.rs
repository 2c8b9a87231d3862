use approx::assert_abs_diff_eq;
use cc_core::models::Demand;
use cc_solver::io::Scenario;
use rstest::*;
use rstest_reuse::{self, *};
use std::{fs::File, io::BufReader, path::PathBuf};

mod all_solvers;
use all_solvers::all_solvers;

// This test case is actually a dynamically generated, Cartesian product of test cases.
// For every solver implementation, and for every (input.json, output.json) pair in `./samples/**`,
//   1. Read in the scenario,
//   2. Read in the known-good demand,
//   3. Check the closed form against the known-good demand,
//   4. Solve numerically and compare against the known-good demand.

#[apply(all_solvers)]
#[rstest]
fn run_scenario(
    solver: impl cc_solver::Solver,
    #[files("tests/samples/**/input.json")] input: PathBuf,
) {
    let mut output = input.clone();
    output.set_file_name("output.json");

    let scenario: Scenario =
        serde_json::from_reader(BufReader::new(File::open(input).unwrap())).unwrap();

    let reference: Demand =
        serde_json::from_reader(BufReader::new(File::open(output).unwrap())).unwrap();

    let report = scenario.solve(&solver).unwrap();

    // The closed form is exact
    cmp(&report.closed_form, &reference, 1e-9);

    // The solver is only approximately so
    assert!(report.numeric.converged);
    assert_abs_diff_eq!(report.numeric.x0, reference.bundle.x0(), epsilon = 1e-2);
    assert_abs_diff_eq!(report.numeric.x1, reference.bundle.x1(), epsilon = 1e-2);
    assert_abs_diff_eq!(report.numeric_utility, reference.utility, epsilon = 1e-2);
}

fn cmp(a: &Demand, b: &Demand, eps: f64) {
    assert_abs_diff_eq!(a.bundle.x0(), b.bundle.x0(), epsilon = eps);
    assert_abs_diff_eq!(a.bundle.x1(), b.bundle.x1(), epsilon = eps);
    assert_abs_diff_eq!(a.utility, b.utility, epsilon = eps);
}
