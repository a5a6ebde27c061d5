use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("Cannot compute depth-weighted statistics for a cluster whose depths sum to zero")]
    NullDepthSum,

    #[error("Computed a non-finite standard deviation (mean: {mean}, sd: {sd}). Clusters must carry at least two observations")]
    NonFiniteDispersion{mean: f64, sd: f64},

    #[error("Degenerate method-of-moments shape parameters (alpha: {alpha}, beta: {beta}). The cluster's variance is inconsistent with a Beta distribution")]
    DegenerateShape{alpha: f64, beta: f64},
}
