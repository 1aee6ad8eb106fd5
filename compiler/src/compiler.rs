use std::fs;
use std::path::Path;

use protoline_wire::{DescriptorBuilder, DynamicMessage, Label, MessageDescriptor, Value as WireValue, WireType};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::{ProtoError, Result},
    normalizer::normalize_lines,
    parser::{parse_lines, ParseOptions},
    types::{Field, FieldProperty, FieldType, Message, ProtoFile},
    utils::quote,
    verifier::verify_file,
};

/// Parse schema text with the default (lenient) options.
pub fn parse_schema(text: &str) -> Result<ProtoFile> {
    parse_schema_with(text, &ParseOptions::default())
}

/// Normalize, classify and build; in strict mode the result is verified too.
pub fn parse_schema_with(text: &str, options: &ParseOptions) -> Result<ProtoFile> {
    let lines = normalize_lines(text);
    let file = parse_lines(&lines, options)?;
    if options.strict {
        verify_file(&file)?;
    }
    Ok(file)
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<ProtoFile> {
    parse_file_with(path, &ParseOptions::default())
}

/// Read the whole file, then parse it. The file is closed before parsing
/// starts.
pub fn parse_file_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<ProtoFile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    info!(path = %path.display(), bytes = text.len(), strict = options.strict, "parsing schema");
    parse_schema_with(&text, options)
}

/// Wire type for a field type; `None` for enum and message fields.
pub fn wire_type(field_type: FieldType) -> Option<WireType> {
    let wire = match field_type {
        FieldType::Bool     => WireType::Bool,
        FieldType::Double   => WireType::Double,
        FieldType::Float    => WireType::Float,
        FieldType::Int32    => WireType::Int32,
        FieldType::UInt32   => WireType::UInt32,
        FieldType::Int64    => WireType::Int64,
        FieldType::UInt64   => WireType::UInt64,
        FieldType::SInt32   => WireType::SInt32,
        FieldType::SInt64   => WireType::SInt64,
        FieldType::Fixed32  => WireType::Fixed32,
        FieldType::Fixed64  => WireType::Fixed64,
        FieldType::SFixed32 => WireType::SFixed32,
        FieldType::SFixed64 => WireType::SFixed64,
        FieldType::String   => WireType::String,
        FieldType::Bytes    => WireType::Bytes,
        FieldType::Enum | FieldType::Message => return None,
    };
    Some(wire)
}

pub fn label(property: FieldProperty) -> Label {
    match property {
        FieldProperty::Required => Label::Required,
        FieldProperty::Optional => Label::Optional,
        FieldProperty::Repeated => Label::Repeated,
    }
}

/// Build the wire descriptor of a message. Enum and message fields are
/// skipped: nested types are not supported by the encoder.
pub fn to_descriptor(message: &Message) -> Result<MessageDescriptor> {
    let mut builder = DescriptorBuilder::new(message.package().unwrap_or_default(), message.name());
    for field in message.fields() {
        match wire_type(field.field_type()) {
            Some(wire) => builder.push_field(field.name(), wire, label(field.property()), field.sequence()),
            None => warn!(
                message = message.name(),
                field = field.name(),
                field_type = %field.field_type(),
                "nested types are not supported; skipping field"
            ),
        }
    }
    Ok(builder.build()?)
}

/// Populate an instance of `descriptor` from each field's example value.
/// Fields without a value stay unset.
pub fn to_dynamic<'d>(message: &Message, descriptor: &'d MessageDescriptor) -> Result<DynamicMessage<'d>> {
    let mut instance = DynamicMessage::new(descriptor);
    for field in message.fields() {
        let (Some(value), Some(wire)) = (field.value(), wire_type(field.field_type())) else {
            continue;
        };
        let value = match field.property() {
            FieldProperty::Repeated => {
                let items = value.as_array().ok_or_else(|| value_error(field, value))?;
                let items = items
                    .iter()
                    .map(|item| json_to_wire(field, wire, item))
                    .collect::<Result<Vec<_>>>()?;
                WireValue::List(items)
            }
            _ => json_to_wire(field, wire, value)?,
        };
        instance.set(field.name(), value)?;
    }
    Ok(instance)
}

/// A message serialized from its example values.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMessage {
    pub descriptor: MessageDescriptor,
    /// Text-format rendering of the values that were encoded.
    pub text:       String,
    pub bytes:      Vec<u8>,
}

impl EncodedMessage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Serialize a message's example values with the protobuf wire format.
pub fn encode_message(message: &Message) -> Result<EncodedMessage> {
    let descriptor = to_descriptor(message)?;
    let (text, bytes) = {
        let instance = to_dynamic(message, &descriptor)?;
        (instance.to_string(), instance.encode_to_vec()?)
    };
    debug!(message = descriptor.full_name(), bytes = bytes.len(), "encoded message");
    Ok(EncodedMessage { descriptor, text, bytes })
}

fn json_to_wire(field: &Field, wire: WireType, value: &Value) -> Result<WireValue> {
    let err = || value_error(field, value);
    let converted = match wire {
        WireType::Bool => match value {
            Value::Bool(b) => WireValue::Bool(*b),
            Value::String(s) if s == "true" => WireValue::Bool(true),
            Value::String(s) if s == "false" => WireValue::Bool(false),
            _ => return Err(err()),
        },
        WireType::Double => WireValue::Double(value.as_f64().ok_or_else(err)?),
        WireType::Float => {
            let v = value.as_f64().ok_or_else(err)? as f32;
            if !v.is_finite() {
                return Err(err());
            }
            WireValue::Float(v)
        }
        WireType::Int32 | WireType::SInt32 | WireType::SFixed32 => {
            let v = value.as_i64().ok_or_else(err)?;
            WireValue::Int32(i32::try_from(v).map_err(|_| err())?)
        }
        WireType::Int64 | WireType::SInt64 | WireType::SFixed64 => WireValue::Int64(value.as_i64().ok_or_else(err)?),
        WireType::UInt32 | WireType::Fixed32 => {
            let v = value.as_u64().ok_or_else(err)?;
            WireValue::UInt32(u32::try_from(v).map_err(|_| err())?)
        }
        WireType::UInt64 | WireType::Fixed64 => WireValue::UInt64(value.as_u64().ok_or_else(err)?),
        WireType::String => WireValue::String(value.as_str().ok_or_else(err)?.to_owned()),
        WireType::Bytes => match value {
            Value::String(s) => WireValue::Bytes(s.as_bytes().to_vec()),
            Value::Array(items) => WireValue::Bytes(
                items
                    .iter()
                    .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()).ok_or_else(err))
                    .collect::<Result<Vec<u8>>>()?,
            ),
            _ => return Err(err()),
        },
    };
    Ok(converted)
}

fn value_error(field: &Field, value: &Value) -> ProtoError {
    ProtoError::Param(format!(
        "Invalid value {} for {} {} field {}",
        value,
        field.property(),
        field.field_type(),
        quote(field.name())
    ))
}
