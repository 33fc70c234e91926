use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// Non-success response, message preferred from the server payload
    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Network(String),

    #[error("Download cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}
