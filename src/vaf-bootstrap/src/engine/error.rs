use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("The number of bootstrap iterations must be greater than 0")]
    NullBootCount,

    #[error("Weighted resampling was requested, but the input table carries no depth columns")]
    MissingDepths,
}
