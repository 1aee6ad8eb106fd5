use std::collections::HashMap;

use crate::{
    error::Result,
    types::{Message, ProtoFile},
    utils::{quote, record_error},
};

/// Checks the lenient parser does not make: every field sequence number in
/// a message is positive and used only once.
pub fn verify_message(message: &Message) -> Result<()> {
    let mut seen: HashMap<u32, &str> = HashMap::new();
    for field in message.fields() {
        if field.sequence() == 0 {
            return Err(record_error(&format!(
                "The sequence for field {} in message {} must be positive",
                quote(field.name()),
                quote(message.name())
            )));
        }
        if let Some(first) = seen.insert(field.sequence(), field.name()) {
            return Err(record_error(&format!(
                "Fields {} and {} in message {} share sequence {}",
                quote(first),
                quote(field.name()),
                quote(message.name()),
                field.sequence()
            )));
        }
    }
    Ok(())
}

pub fn verify_file(file: &ProtoFile) -> Result<()> {
    file.messages().iter().try_for_each(verify_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Field;

    fn message(fields: &[(&str, u32)]) -> Message {
        let mut message = Message::new("M", None).unwrap();
        for (name, sequence) in fields {
            message.add_field(Field::new(name, "int32", "optional", *sequence).unwrap());
        }
        message
    }

    #[test]
    fn verify_accepts_unique_sequences() {
        assert!(verify_message(&message(&[("a", 1), ("b", 3), ("c", 2)])).is_ok());
        assert!(verify_message(&message(&[])).is_ok());
    }

    #[test]
    fn verify_rejects_duplicates() {
        let err = verify_message(&message(&[("a", 1), ("b", 1)])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Format error: Fields \"a\" and \"b\" in message \"M\" share sequence 1"
        );
    }

    #[test]
    fn verify_rejects_zero() {
        let err = verify_message(&message(&[("a", 0)])).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn verify_file_checks_every_message() {
        let mut file = ProtoFile::new();
        file.insert(message(&[("a", 1)]));
        assert!(verify_file(&file).is_ok());

        let mut bad = message(&[("a", 2), ("b", 2)]);
        bad.name = "Bad".into();
        file.insert(bad);
        assert!(verify_file(&file).is_err());
    }
}
