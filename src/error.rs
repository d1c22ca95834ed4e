use thiserror::Error;

/// Errors raised while loading or reshaping the FAA / AEA tables
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Missing column in {file} file: {column}")]
    MissingColumn { file: String, column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataError {
    pub fn missing_column(file: &str, column: &str) -> Self {
        DataError::MissingColumn {
            file: file.to_string(),
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
