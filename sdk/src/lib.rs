//! protoline
//!
//! Convenience layer over the protoline compiler and wire crates.
//!
//! - The data model and `JsonRecord` trait (re-exported from compiler)
//! - String-level helpers: schema text → message JSON, message JSON → wire bytes

pub use protoline_compiler::{
    encode_message, parse_file, parse_file_with, parse_schema, parse_schema_with, EncodedMessage, Field,
    FieldProperty, FieldType, JsonRecord, Message, ParseOptions, ProtoError, ProtoFile,
};

/// Parse schema text and return the JSON of the message called `name`.
pub fn schema_message_to_json(schema: &str, name: &str) -> Result<String, ProtoError> {
    parse_schema(schema)?.message_to_json(name)
}

/// Parse schema text and return every message as a pretty-printed JSON array.
pub fn schema_to_json_pretty(schema: &str, options: &ParseOptions) -> Result<String, ProtoError> {
    let messages = parse_schema_with(schema, options)?.messages_to_json()?;
    Ok(serde_json::to_string_pretty(&messages)?)
}

/// Build a message from its JSON text and serialize its example values.
pub fn json_to_wire(json: &str) -> Result<EncodedMessage, ProtoError> {
    let message = Message::from_json_str(json)?;
    encode_message(&message)
}

pub mod traits {
    pub use protoline_compiler::traits::JsonRecord;
}

pub mod error {
    pub use protoline_compiler::error::ProtoError;
    pub use protoline_wire::WireError;
}

pub mod wire {
    pub use protoline_wire::{DescriptorBuilder, DynamicMessage, Label, MessageDescriptor, Value, WireType};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_message_to_json() {
        let json = schema_message_to_json("message A {\n  optional bool on = 1;\n}\n", "A").unwrap();
        assert_eq!(
            json,
            r#"{"message_name":"A","message_comment":null,"message_pkg":null,"field_list":[{"field_name":"on","field_type":"bool","field_property":"optional","field_sequence":1,"field_default":null,"field_comment":"","field_value":null}]}"#
        );
        assert!(schema_message_to_json("message A {}", "B").is_err());
    }

    #[test]
    fn test_schema_to_json_pretty() {
        let text = schema_to_json_pretty("message A {}\nmessage B {}", &ParseOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[1]["message_name"], "B");
    }

    #[test]
    fn test_json_to_wire() {
        let encoded = json_to_wire(
            r#"{"message_name": "T", "field_list": [
                {"field_name": "id", "field_type": "sint32", "field_property": "required",
                 "field_sequence": 1, "field_value": -1}
            ]}"#,
        )
        .unwrap();
        assert_eq!(encoded.bytes, [0x08, 0x01]);
        assert!(matches!(json_to_wire("{}"), Err(ProtoError::Format { .. })));
    }
}
