use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Input variant table '{0}' does not exist or is not a regular file")]
    MissingInput(String),

    #[error("--num-boots must be strictly positive")]
    NullBootCount,

    #[error("Found {found} depth column(s) for {expected} VAF column(s). --depth-cols must pair up with --vaf-cols, in the same order")]
    DepthColsMismatch{found: usize, expected: usize},

    #[error("--weighted requires matching --depth-cols")]
    MissingDepthCols,

    #[error("'{0}' already exists. Use --overwrite to replace previous output files")]
    CannotOverwrite(String),
}
