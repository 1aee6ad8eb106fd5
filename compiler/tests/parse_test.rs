#![cfg(test)]

use std::io::Write;

use pretty_assertions::assert_eq;
use protoline_compiler::{
    encode_message, normalizer::normalize, parse_file, parse_file_with, parse_schema, parse_schema_with, FieldProperty,
    FieldType, JsonRecord, Message, ParseOptions, ProtoError,
};
use serde_json::json;

const TEST_PROTO: &str = r#"package pkg;

// first test message
message Test1 {
  required string name = 1; //the name
  optional int32  id   = 2;
  repeated bytes  blobs = 3; // raw blobs
}

message Test2{
  optional double ratio=1;}
"#;

#[test]
fn test_parse_schema() {
    let file = parse_schema(TEST_PROTO).expect("parse_schema failed");

    assert_eq!(file.package(), "pkg");
    assert_eq!(file.len(), 2);

    let test1 = file.get("Test1").expect("Test1 missing");
    assert_eq!(test1.comment(), Some(" first test message"));
    assert_eq!(test1.package(), Some("pkg"));
    assert_eq!(test1.fields().len(), 3);

    let name = &test1.fields()[0];
    assert_eq!(name.name(), "name");
    assert_eq!(name.field_type(), FieldType::String);
    assert_eq!(name.property(), FieldProperty::Required);
    assert_eq!(name.sequence(), 1);
    assert_eq!(name.comment(), "the name");

    let blobs = &test1.fields()[2];
    assert_eq!(blobs.property(), FieldProperty::Repeated);
    assert_eq!(blobs.field_type(), FieldType::Bytes);
    assert_eq!(blobs.comment(), " raw blobs");

    let test2 = file.get("Test2").expect("Test2 missing");
    assert_eq!(test2.comment(), None);
    assert_eq!(test2.fields()[0].field_type(), FieldType::Double);
}

#[test]
fn test_normalize_is_stable() {
    let once = normalize(TEST_PROTO);
    assert_eq!(normalize(&once), once);
    assert_eq!(
        once.lines().take(4).collect::<Vec<_>>(),
        ["package pkg", "// first test message", "message Test1", "{"]
    );
}

#[test]
fn test_message_to_json() {
    let file = parse_schema(TEST_PROTO).expect("parse_schema failed");
    let text = file.message_to_json("Test1").expect("message_to_json failed");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["message_name"], json!("Test1"));
    assert_eq!(value["message_pkg"], json!("pkg"));
    assert_eq!(
        value["field_list"][0],
        json!({
            "field_name": "name",
            "field_type": "string",
            "field_property": "required",
            "field_sequence": 1,
            "field_default": null,
            "field_comment": "the name",
            "field_value": null
        })
    );

    let back = Message::from_json_str(&text).expect("from_json_str failed");
    assert_eq!(&back, file.get("Test1").unwrap());
}

#[test]
fn test_parse_file() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(TEST_PROTO.as_bytes()).unwrap();

    let file = parse_file(tmp.path()).expect("parse_file failed");
    assert_eq!(file.messages().iter().map(|m| m.name()).collect::<Vec<_>>(), ["Test1", "Test2"]);
}

#[test]
fn test_parse_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(dir.path().join("missing.proto")).unwrap_err();
    assert!(matches!(err, ProtoError::Io(_)), "{:?}", err);
}

#[test]
fn test_import_aborts_parse() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    writeln!(tmp, "package pkg;\nimport \"other.proto\";\nmessage A {{}}").unwrap();

    let err = parse_file_with(tmp.path(), &ParseOptions::strict()).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_strict_mode() {
    let unclosed = "message A {\n  optional int32 a = 1;\n";
    assert!(parse_schema(unclosed).expect("lenient parse failed").is_empty());
    assert!(parse_schema_with(unclosed, &ParseOptions::strict()).is_err());

    let zero = "message A { optional int32 a = 0; }";
    assert!(parse_schema(zero).is_ok());
    let err = parse_schema_with(zero, &ParseOptions::strict()).unwrap_err();
    assert!(err.to_string().contains("must be positive"), "{}", err);
}

#[test]
fn test_errors_carry_line_numbers() {
    let err = parse_schema("package pkg;\n\nmessage A {\n  optional int32 a = 1;\n  optional int32 = 2;\n}\n").unwrap_err();
    assert_eq!(err.line(), Some(5));
    assert!(err.to_string().starts_with("Format error at line 5:"), "{}", err);
}

#[test]
fn test_encode_from_json() {
    let message = Message::from_json(&json!({
        "message_name": "Test3",
        "message_comment": "third test message",
        "field_list": [
            {"field_name": "first_field", "field_type": "string", "field_property": "required",
             "field_sequence": 1, "field_comment": "first field", "field_value": "hello,world"},
            {"field_name": "second_field", "field_type": "int32", "field_property": "optional",
             "field_sequence": 2, "field_comment": "second field", "field_value": 10086}
        ]
    }))
    .expect("from_json failed");

    let encoded = encode_message(&message).expect("encode_message failed");
    assert_eq!(encoded.len(), 16);
    assert_eq!(encoded.text, "first_field: \"hello,world\"\nsecond_field: 10086\n");

    let mut expected = vec![0x0a, 0x0b];
    expected.extend_from_slice(b"hello,world");
    expected.extend_from_slice(&[0x10, 0xe6, 0x4e]);
    assert_eq!(encoded.bytes, expected);
}

#[test]
fn test_parsed_schema_encodes_without_values() {
    let file = parse_schema(TEST_PROTO).expect("parse_schema failed");
    let encoded = encode_message(file.get("Test2").unwrap()).expect("encode_message failed");
    assert_eq!(encoded.descriptor.full_name(), "pkg.Test2");
    assert!(encoded.is_empty());
}
