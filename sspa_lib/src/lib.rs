//! Single-sample pathway analysis (ssPA) utilities for metabolomics data.
//!
//! The main entry point is [`methods::ora::get_ora`], which tests a list of
//! differentially abundant compounds for over-representation in every pathway
//! of a [`catalog::PathwayCatalog`]. Identifier mapping lives in
//! [`identifiers`] and the single-sample scoring wrapper in [`methods::ssgsea`].
use thiserror::Error;

pub mod catalog;
pub mod identifiers;
pub mod matrix;
pub mod methods;
pub mod readers;
pub mod stat;
pub mod writers;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed file: {0}")]
    MalformedFile(#[from] MalformedError),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("statistics error: {0}")]
    Statistics(#[from] StatisticsError),
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },
    #[error("unknown identifier type: {0}")]
    UnknownIdentifierType(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MalformedError {
    #[error("no columns found on line {0}")]
    NoColumnsFound(usize),
    #[error("wrong format on line {line}: {reason}")]
    WrongFormat { line: usize, reason: String },
    #[error("missing required column {0}")]
    MissingColumn(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum StatisticsError {
    #[error("found NaN p-value at index {0}")]
    FoundNANValue(usize),
    #[error("p-value {value} at index {index} is outside [0, 1]")]
    InvalidValue { index: usize, value: f64 },
    #[error("contingency table has no observations")]
    EmptyTable,
    #[error("invalid hypergeometric parameters: population {population}, successes {successes}, draws {draws}")]
    InvalidHypergeometric {
        population: u64,
        successes: u64,
        draws: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
