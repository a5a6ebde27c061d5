use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("Column '{column}' carries {found} value(s), while the cluster column carries {expected}")]
    UnevenColumns{column: String, found: usize, expected: usize},

    #[error("Weighted mode requires one depth column per VAF column (found {found} depth column(s) for {expected} VAF column(s))")]
    DepthCountMismatch{found: usize, expected: usize},

    #[error("Column '{0}' is declared both as a VAF and as a depth column")]
    OverlappingColumns(String),

    #[error("VAF value {value} within column '{column}' lies outside the [0, 1] range")]
    VafOutOfRange{column: String, value: f64},
}
