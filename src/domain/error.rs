use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Only .pbit files are accepted (got \"{0}\")")]
    InvalidFileType(String),

    #[error("Upload failed: {0}")]
    Transport(String),

    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("An upload is already in progress")]
    Busy,

    #[error("I/O error: {0}")]
    Io(String),
}
