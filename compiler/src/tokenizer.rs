use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Result,
    types::{FieldProperty, FieldType},
    utils::{format_error, is_identifier, quote},
};

lazy_static! {
    static ref SEQUENCE: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// The five logical parts of a field declaration line.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub property:   FieldProperty,
    pub field_type: FieldType,
    pub name:       String,
    pub sequence:   u32,
    pub comment:    String,
}

/// Split a field declaration into its words: `[property, type, name,
/// sequence]` plus the trailing comment when there is one.
///
/// Tabs, `=` and `;` act as spaces. A `/` starts the comment, which takes
/// the rest of the line verbatim minus its leading `//`.
pub fn split_field_words(text: &str, line: usize) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();

    for (i, ch) in text.char_indices() {
        match ch {
            ' ' | '\t' | '=' | ';' | '\r' | '\n' => {
                if !word.is_empty() {
                    words.push(std::mem::take(&mut word));
                }
            }
            '/' => {
                if !word.is_empty() {
                    words.push(std::mem::take(&mut word));
                }
                let rest = &text[i..];
                let comment = rest
                    .strip_prefix("//")
                    .or_else(|| rest.strip_prefix('/'))
                    .unwrap_or(rest);
                words.push(comment.trim_end_matches(['\r', '\n']).to_owned());
                return Ok(words);
            }
            c if c.is_alphanumeric() || c == '_' => word.push(c),
            other => {
                return Err(format_error(
                    &format!("Unexpected character {} in field declaration", quote(&other.to_string())),
                    line,
                ));
            }
        }
    }
    if !word.is_empty() {
        words.push(word);
    }
    Ok(words)
}

/// Parse a field declaration line. `line` is the source line number used
/// in error messages.
pub fn tokenize_field(text: &str, line: usize) -> Result<FieldDecl> {
    let words = split_field_words(text, line)?;
    let invalid = || {
        format_error(
            &format!("Message element format invalid: {}", quote(text.trim())),
            line,
        )
    };

    if words.len() != 4 && words.len() != 5 {
        return Err(invalid());
    }
    let property: FieldProperty = words[0].parse().map_err(|_| invalid())?;
    let field_type: FieldType = words[1].parse().map_err(|_| invalid())?;
    if !is_identifier(&words[2]) {
        return Err(invalid());
    }
    if !SEQUENCE.is_match(&words[3]) {
        return Err(invalid());
    }
    let sequence: u32 = words[3].parse().map_err(|_| {
        format_error(&format!("Field sequence {} out of range", words[3]), line)
    })?;

    let mut words = words.into_iter();
    let name = words.nth(2).unwrap_or_default();
    let comment = words.nth(1).unwrap_or_default();

    Ok(FieldDecl {
        property,
        field_type,
        name,
        sequence,
        comment,
    })
}
