use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Unsupported document type '{0}': upload a Word (.docx), PDF (.pdf) or plain text (.txt) file")]
    UnsupportedFormat(String),

    #[error("Could not read the uploaded {format} document: {reason}")]
    DocumentRead { format: String, reason: String },

    #[error(
        "No Business Model Canvas content was detected. Use the BMC template: either a two-column table \
         with block labels (e.g. \"1) Problem\") in the first column and your answers in the second, \
         or a heading paragraph for each block followed by your answer"
    )]
    NoContentDetected,

    #[error("Coaching request failed: {0}")]
    LlmRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report rendering failed: {0}")]
    Render(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoachError>;
