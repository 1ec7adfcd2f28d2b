use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    ValidationError(String),
    /// Unsupported or malformed input during table loading.
    FormatError(String),
    /// Invalid column choice or a whole-column coercion failure.
    AnalysisError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::FormatError(msg) => write!(f, "Format error: {}", msg),
            AppError::AnalysisError(msg) => write!(f, "Analysis error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl AppError {
    /// True for errors caused by the caller's input. The transport layer maps
    /// these to a 4xx status; everything else is a 5xx.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, AppError::Internal(_) | AppError::IoError(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
