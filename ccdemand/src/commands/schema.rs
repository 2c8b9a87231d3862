use cc_solver::{
    clarabel::ClarabelData,
    io::{Report, Scenario},
    nlopt::NloptData,
};
use schemars::{Schema, schema_for};
use serde::Serialize;

/// The JSON schemas of the `solve` input and output formats
#[derive(Serialize)]
pub struct Schemas {
    pub scenario: Schema,
    pub clarabel_report: Schema,
    pub nlopt_report: Schema,
}

pub fn schemas() -> Schemas {
    Schemas {
        scenario: schema_for!(Scenario),
        clarabel_report: schema_for!(Report<ClarabelData>),
        nlopt_report: schema_for!(Report<NloptData>),
    }
}
