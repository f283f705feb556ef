use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Precondition Error: {0}")]
    Precondition(String),

    #[error("Resource Exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type TfResult<T> = Result<T, TeamForgeError>;
