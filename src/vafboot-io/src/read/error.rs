use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("The input table is empty: expected a header line")]
    MissingHeader,

    #[error("Missing column '{0}' within the input table header")]
    MissingColumn(String),

    #[error("Line {line}: expected {expected} field(s), found {found}")]
    UnevenRow{line: usize, expected: usize, found: usize},

    #[error("Line {line}: failed to parse field of column '{column}' [{msg}]")]
    ParseField{line: usize, column: String, msg: String},
}
