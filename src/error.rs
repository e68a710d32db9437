use std::path::PathBuf;
use thiserror::Error;

/// Structurally invalid input file
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Input file {} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },
}

/// Misuse of the natural-numbers utility
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NaturalsError {
    #[error("Number must be between 1 and 100, got {0}")]
    OutOfRange(i64),

    #[error("Number {0} was already extracted")]
    AlreadyExtracted(i64),

    #[error("No number has been extracted yet")]
    NothingExtracted,

    #[error("{0} numbers were extracted; the missing one is ambiguous")]
    AmbiguousMissing(usize),
}
