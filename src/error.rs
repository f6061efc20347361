//! Error handling for the CV ranker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvRankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, CvRankerError>;

/// model2vec reports loading failures through anyhow
impl From<anyhow::Error> for CvRankerError {
    fn from(err: anyhow::Error) -> Self {
        CvRankerError::ModelLoading(format!("{:#}", err))
    }
}
