use thiserror::Error;

/// Study Buddy errors
#[derive(Error, Debug)]
pub enum StudyError {
    /// The generation endpoint could not be reached or the connection dropped.
    #[error("Transport Error: {0}")]
    Transport(String),

    /// The endpoint answered with a status other than 200.
    #[error("Service Error: {status_code} - {message}")]
    Service { status_code: u16, message: String },

    /// 200 response whose payload lacks the expected field.
    #[error("Malformed Response: {0}")]
    MalformedResponse(String),

    #[error("Parsing Error: {0}")]
    Parsing(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    #[error("Item count must be between {min} and {max}, got {got}")]
    InvalidItemCount { got: i64, min: u8, max: u8 },

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for Study Buddy operations
pub type StudyResult<T> = Result<T, StudyError>;
