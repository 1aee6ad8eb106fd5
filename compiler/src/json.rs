use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ProtoError, Result},
    traits::JsonRecord,
    types::{Field, FieldProperty, FieldType, Message, ProtoFile},
    utils::{quote, record_error},
};

#[derive(Deserialize)]
struct FieldRecord {
    field_name:     String,
    field_type:     String,
    field_property: String,
    field_sequence: u32,
    #[serde(default)]
    field_default:  Option<Value>,
    #[serde(default)]
    field_comment:  Option<String>,
    #[serde(default)]
    field_value:    Option<Value>,
}

#[derive(Deserialize)]
struct MessageRecord {
    message_name:    String,
    #[serde(default)]
    message_comment: Option<String>,
    #[serde(default)]
    message_pkg:     Option<String>,
    #[serde(default)]
    field_list:      Vec<Value>,
}

impl JsonRecord for Field {
    fn from_json(value: &Value) -> Result<Self> {
        let record = FieldRecord::deserialize(value)
            .map_err(|e| record_error(&format!("Invalid JSON record for Field: {}", e)))?;

        if record.field_name.trim().is_empty() {
            return Err(record_error("Invalid JSON record for Field: field_name is blank"));
        }
        let field_type: FieldType = record.field_type.parse().map_err(|_| {
            record_error(&format!(
                "Invalid JSON record for Field: unknown field_type {}",
                quote(&record.field_type)
            ))
        })?;
        let property: FieldProperty = record.field_property.parse().map_err(|_| {
            record_error(&format!(
                "Invalid JSON record for Field: unknown field_property {}",
                quote(&record.field_property)
            ))
        })?;

        Ok(Field {
            name: record.field_name,
            field_type,
            property,
            sequence: record.field_sequence,
            default: record.field_default,
            comment: record.field_comment.unwrap_or_default(),
            value: record.field_value,
        })
    }
}

impl JsonRecord for Message {
    fn from_json(value: &Value) -> Result<Self> {
        let record = MessageRecord::deserialize(value)
            .map_err(|e| record_error(&format!("Invalid JSON record for Message: {}", e)))?;

        if record.message_name.trim().is_empty() {
            return Err(record_error("Invalid JSON record for Message: message_name is blank"));
        }
        if record.field_list.is_empty() {
            return Err(record_error("Invalid JSON record for Message: field_list is empty"));
        }

        let fields = record
            .field_list
            .iter()
            .enumerate()
            .map(|(i, field)| {
                Field::from_json(field).map_err(|e| match e {
                    ProtoError::Format { msg, line } => ProtoError::Format {
                        msg: format!("field_list[{}]: {}", i, msg),
                        line,
                    },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Message {
            name:    record.message_name,
            comment: record.message_comment,
            package: record.message_pkg,
            fields,
        })
    }
}

impl ProtoFile {
    /// JSON text of the message called `name`.
    pub fn message_to_json(&self, name: &str) -> Result<String> {
        self.get(name)
            .ok_or_else(|| ProtoError::Param(format!("Message {} not found", quote(name))))?
            .to_json_string()
    }

    /// Every message as a JSON array, in definition order.
    pub fn messages_to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.messages())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn test3_json() -> Value {
        json!({
            "message_name": "Test3",
            "message_comment": "third test message",
            "field_list": [
                {
                    "field_name": "first_field",
                    "field_type": "string",
                    "field_property": "required",
                    "field_sequence": 1,
                    "field_comment": "first field",
                    "field_value": "hello,world"
                },
                {
                    "field_name": "second_field",
                    "field_type": "int32",
                    "field_property": "optional",
                    "field_sequence": 2,
                    "field_comment": "second field",
                    "field_value": 10086
                }
            ]
        })
    }

    #[test]
    fn field_round_trip() {
        let field = Field::new("count", "uint64", "repeated", 7)
            .unwrap()
            .with_default(json!(3))
            .with_comment("a count")
            .with_value(json!([1, 2]));
        let decoded = Field::from_json(&field.to_json().unwrap()).unwrap();
        assert_eq!(decoded, field);

        let bare = Field::new("flag", "bool", "optional", 1).unwrap();
        assert_eq!(Field::from_json_str(&bare.to_json_string().unwrap()).unwrap(), bare);
    }

    #[test]
    fn field_round_trip_with_null_values() {
        let field = Field::new("a", "int32", "optional", 1)
            .unwrap()
            .with_default(json!(null))
            .with_value(json!(null));
        assert!(field.default_value().is_none());
        assert!(field.value().is_none());
        assert_eq!(Field::from_json(&field.to_json().unwrap()).unwrap(), field);
    }

    #[test]
    fn field_encoding_emits_every_key() {
        let field = Field::new("name", "string", "required", 1).unwrap();
        assert_eq!(
            field.to_json().unwrap(),
            json!({
                "field_name": "name",
                "field_type": "string",
                "field_property": "required",
                "field_sequence": 1,
                "field_default": null,
                "field_comment": "",
                "field_value": null
            })
        );
        assert_eq!(
            field.to_json_string().unwrap(),
            r#"{"field_name":"name","field_type":"string","field_property":"required","field_sequence":1,"field_default":null,"field_comment":"","field_value":null}"#
        );
    }

    #[test]
    fn field_decode_defaults() {
        let field = Field::from_json(&json!({
            "field_name": "a",
            "field_type": "bytes",
            "field_property": "optional",
            "field_sequence": 4
        }))
        .unwrap();
        assert_eq!(field.comment(), "");
        assert!(field.default_value().is_none());
        assert!(field.value().is_none());
    }

    #[test]
    fn field_decode_rejects_bad_records() {
        let bad = [
            json!({"field_type": "bool", "field_property": "optional", "field_sequence": 1}),
            json!({"field_name": "a", "field_type": "bogus", "field_property": "optional", "field_sequence": 1}),
            json!({"field_name": "a", "field_type": "bool", "field_property": "maybe", "field_sequence": 1}),
            json!({"field_name": "a", "field_type": "bool", "field_property": "optional", "field_sequence": "1"}),
            json!({"field_name": "a", "field_type": "bool", "field_property": "optional", "field_sequence": 1.5}),
            json!({"field_name": "a", "field_type": "bool", "field_property": "optional", "field_sequence": -1}),
            json!({"field_name": "", "field_type": "bool", "field_property": "optional", "field_sequence": 1}),
            json!("not an object"),
        ];
        for record in bad {
            let err = Field::from_json(&record).unwrap_err();
            assert!(matches!(err, ProtoError::Format { line: None, .. }), "{}: {:?}", record, err);
        }
    }

    #[test]
    fn message_decode() {
        let message = Message::from_json(&test3_json()).unwrap();
        assert_eq!(message.name(), "Test3");
        assert_eq!(message.comment(), Some("third test message"));
        assert_eq!(message.package(), None);
        assert_eq!(message.fields().len(), 2);
        assert_eq!(message.fields()[0].name(), "first_field");
        assert_eq!(message.fields()[1].value(), Some(&json!(10086)));
    }

    #[test]
    fn message_round_trip_preserves_order() {
        let mut message = Message::from_json(&test3_json()).unwrap();
        message.package = Some("pkg".into());
        let decoded = Message::from_json_str(&message.to_json_pretty().unwrap()).unwrap();
        assert_eq!(decoded, message);
        let names: Vec<&str> = decoded.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["first_field", "second_field"]);
    }

    #[test]
    fn message_decode_rejects_bad_records() {
        let err = Message::from_json(&json!({"message_name": "Empty", "field_list": []})).unwrap_err();
        assert!(err.to_string().contains("field_list is empty"));

        let err = Message::from_json(&json!({"field_list": [{}]})).unwrap_err();
        assert!(matches!(err, ProtoError::Format { .. }));

        let mut record = test3_json();
        record["field_list"][1]["field_type"] = json!("int128");
        let err = Message::from_json(&record).unwrap_err();
        assert!(err.to_string().contains("field_list[1]"), "{}", err);
    }

    #[test]
    fn file_message_to_json() {
        let mut file = ProtoFile::new();
        file.insert(Message::from_json(&test3_json()).unwrap());

        let text = file.message_to_json("Test3").unwrap();
        assert!(text.starts_with(r#"{"message_name":"Test3","message_comment":"third test message","message_pkg":null,"field_list":["#));
        assert!(matches!(file.message_to_json("Missing"), Err(ProtoError::Param(_))));

        let all = file.messages_to_json().unwrap();
        assert_eq!(all.as_array().map(Vec::len), Some(1));
        assert_eq!(all[0]["field_list"][1]["field_value"], json!(10086));
    }

    #[test]
    fn malformed_json_text() {
        assert!(matches!(Message::from_json_str("{not json"), Err(ProtoError::Json(_))));
    }
}
