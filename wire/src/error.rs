use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WireError {
    #[error("Message name must not be empty")]
    EmptyName,

    #[error("Duplicate field \"{field}\" in message {message}")]
    DuplicateField { message: String, field: String },

    #[error("Duplicate tag {tag} in message {message}")]
    DuplicateTag { message: String, tag: u32 },

    #[error("Invalid tag {tag} for field \"{field}\"")]
    InvalidTag { field: String, tag: u32 },

    #[error("Unknown field \"{field}\" in message {message}")]
    UnknownField { message: String, field: String },

    #[error("Type mismatch for field \"{field}\": expected {expected}, got {actual}")]
    TypeMismatch {
        field:    String,
        expected: String,
        actual:   String,
    },

    #[error("Missing required field \"{field}\" in message {message}")]
    MissingRequired { message: String, field: String },
}
