use protoline_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid arguments to a direct constructor.
    #[error("Invalid parameter: {0}")]
    Param(String),

    /// Malformed JSON record, malformed declaration line or a structural
    /// violation of the message automaton.
    #[error("Format error{}: {msg}", at_line(.line))]
    Format {
        msg:  String,
        line: Option<usize>,
    },

    /// A line the automaton has no transition for.
    #[error("Undefined line at line {line}: {msg}")]
    Undefine {
        msg:  String,
        line: usize,
    },

    /// A language feature this front-end refuses to handle. Parsing stops
    /// outright; callers should not try to continue.
    #[error("Unsupported feature at line {line}: {feature}")]
    Unsupported {
        feature: String,
        line:    usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Wire encode error: {0}")]
    Encode(#[from] WireError),
}

impl ProtoError {
    /// True for errors that must end the whole run, not just the current parse.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProtoError::Unsupported { .. })
    }

    /// Source line the error points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ProtoError::Format { line, .. } => *line,
            ProtoError::Undefine { line, .. } | ProtoError::Unsupported { line, .. } => Some(*line),
            _ => None,
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ProtoError>;
