/// Implementation using the Clarabel interior point solver
#[cfg(feature = "clarabel")]
pub mod clarabel;

/// Implementation using the SLSQP routine of the NLopt library
#[cfg(feature = "nlopt")]
pub mod nlopt;
