//! Error types shared across the crate

use thiserror::Error;

/// Errors raised by scheduling, simulation, metrics and data loading
#[derive(Debug, Error)]
pub enum CppiError {
    /// A parameter is outside its supported range (floor, multiplier, frequency, confidence)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The input is too short or too flat for the requested statistic
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Risky/safe returns are missing, unordered or of different lengths
    #[error("misaligned data: {0}")]
    MisalignedData(String),

    #[error("invalid date '{value}': {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid price '{value}' on {date}")]
    PriceParse { date: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CppiError>;
