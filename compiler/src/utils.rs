use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ProtoError;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// ASCII identifier rule shared by message and field names.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Quote `text` as a JSON string literal for error messages.
pub fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

pub fn format_error(msg: &str, line: usize) -> ProtoError {
    ProtoError::Format {
        msg:  msg.to_string(),
        line: Some(line),
    }
}

pub fn record_error(msg: &str) -> ProtoError {
    ProtoError::Format {
        msg:  msg.to_string(),
        line: None,
    }
}
