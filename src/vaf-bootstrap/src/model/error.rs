use thiserror::Error;

use crate::stats::StatsError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Unknown bootstrap model: '{0}' (expected one of: normal, normal-truncated, beta, binomial, beta-binomial, non-parametric)")]
    UnknownModel(String),

    #[error(transparent)]
    DegenerateCluster(#[from] StatsError),

    #[error("Failed to instantiate the {model} sampler [{msg}]")]
    InvalidDistribution{model: &'static str, msg: String},

    #[error("Cannot resample from an empty observation vector")]
    EmptyObservations,

    #[error("Truncated-normal sampling failed to produce a value within [0, 1] after {0} attempts")]
    TruncationExhausted(usize),

    #[error("Truncated-normal sampling with zero dispersion and an out-of-bounds mean ({0})")]
    TruncationOutOfBounds(f64),
}
