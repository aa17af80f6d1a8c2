use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
