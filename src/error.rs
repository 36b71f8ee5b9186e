use crate::lifecycle::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("No usable player records after processing")]
    NoUsableData,

    #[error("Render Error: {0}")]
    Render(#[from] RenderError),
}

pub type BoardResult<T> = Result<T, BoardError>;
