use std::fmt;

use prost::bytes::BufMut;
use prost::encoding;
use tracing::trace;

use crate::{
    descriptor::{FieldDescriptor, Label, MessageDescriptor, WireType},
    error::WireError,
    value::Value,
};

/// An encodable instance of a [MessageDescriptor](struct.MessageDescriptor.html).
///
/// Values are type-checked against the descriptor when they are set, so
/// encoding only has to check that every required field is present.
#[derive(Clone, PartialEq)]
pub struct DynamicMessage<'d> {
    descriptor: &'d MessageDescriptor,
    values:     Vec<Option<Value>>,
}

impl<'d> DynamicMessage<'d> {
    pub fn new(descriptor: &'d MessageDescriptor) -> Self {
        DynamicMessage {
            descriptor,
            values: vec![None; descriptor.fields().len()],
        }
    }

    pub fn descriptor(&self) -> &'d MessageDescriptor {
        self.descriptor
    }

    /// Sets a field. Repeated fields take a [List](enum.Value.html#variant.List)
    /// whose elements all match the field's wire type.
    pub fn set(&mut self, name: &str, value: Value) -> Result<&mut Self, WireError> {
        let index = self
            .descriptor
            .field_index(name)
            .ok_or_else(|| WireError::UnknownField {
                message: self.descriptor.full_name().to_owned(),
                field:   name.to_owned(),
            })?;
        let field = &self.descriptor.fields()[index];

        let mismatch = |actual: &Value| WireError::TypeMismatch {
            field:    field.name.clone(),
            expected: field.wire_type.value_kind().to_owned(),
            actual:   actual.kind().to_owned(),
        };
        match (field.label, &value) {
            (Label::Repeated, Value::List(items)) => {
                if let Some(bad) = items.iter().find(|item| !field.wire_type.accepts(item)) {
                    return Err(mismatch(bad));
                }
            }
            (Label::Repeated, other) => {
                return Err(WireError::TypeMismatch {
                    field:    field.name.clone(),
                    expected: "list".to_owned(),
                    actual:   other.kind().to_owned(),
                });
            }
            (_, other) if !field.wire_type.accepts(other) => return Err(mismatch(other)),
            _ => {}
        }

        self.values[index] = Some(value);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.descriptor
            .field_index(name)
            .and_then(|index| self.values[index].as_ref())
    }

    pub fn clear(&mut self, name: &str) {
        if let Some(index) = self.descriptor.field_index(name) {
            self.values[index] = None;
        }
    }

    /// Names of required fields that have no value yet.
    pub fn missing_required(&self) -> Vec<&'d str> {
        self.descriptor
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(field, value)| field.label == Label::Required && value.is_none())
            .map(|(field, _)| field.name.as_str())
            .collect()
    }

    pub fn is_initialized(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Size in bytes of the serialized message.
    pub fn encoded_len(&self) -> usize {
        self.set_fields()
            .map(|(field, value)| field_len(field, value))
            .sum()
    }

    /// Appends the serialized message to `buf`. Fails when a required field
    /// is unset.
    pub fn encode(&self, buf: &mut impl BufMut) -> Result<(), WireError> {
        if let Some(field) = self.missing_required().first() {
            return Err(WireError::MissingRequired {
                message: self.descriptor.full_name().to_owned(),
                field:   field.to_string(),
            });
        }
        for (field, value) in self.set_fields() {
            trace!(field = %field.name, tag = field.tag, "encoding field");
            encode_field(field, value, &mut *buf)?;
        }
        Ok(())
    }

    pub fn encode_to_vec(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf)
    }

    fn set_fields(&self) -> impl Iterator<Item = (&'d FieldDescriptor, &Value)> + '_ {
        self.descriptor
            .fields()
            .iter()
            .zip(&self.values)
            .filter_map(|(field, value)| value.as_ref().map(|value| (field, value)))
    }
}

fn field_len(field: &FieldDescriptor, value: &Value) -> usize {
    match value {
        Value::List(items) => items.iter().map(|item| scalar_len(field.wire_type, field.tag, item)).sum(),
        scalar => scalar_len(field.wire_type, field.tag, scalar),
    }
}

fn encode_field(field: &FieldDescriptor, value: &Value, buf: &mut impl BufMut) -> Result<(), WireError> {
    match value {
        Value::List(items) => {
            for item in items {
                encode_scalar(field, item, &mut *buf)?;
            }
            Ok(())
        }
        scalar => encode_scalar(field, scalar, buf),
    }
}

fn scalar_len(wire_type: WireType, tag: u32, value: &Value) -> usize {
    match (wire_type, value) {
        (WireType::Bool, Value::Bool(v))         => encoding::bool::encoded_len(tag, v),
        (WireType::Double, Value::Double(v))     => encoding::double::encoded_len(tag, v),
        (WireType::Float, Value::Float(v))       => encoding::float::encoded_len(tag, v),
        (WireType::Int32, Value::Int32(v))       => encoding::int32::encoded_len(tag, v),
        (WireType::SInt32, Value::Int32(v))      => encoding::sint32::encoded_len(tag, v),
        (WireType::SFixed32, Value::Int32(v))    => encoding::sfixed32::encoded_len(tag, v),
        (WireType::Int64, Value::Int64(v))       => encoding::int64::encoded_len(tag, v),
        (WireType::SInt64, Value::Int64(v))      => encoding::sint64::encoded_len(tag, v),
        (WireType::SFixed64, Value::Int64(v))    => encoding::sfixed64::encoded_len(tag, v),
        (WireType::UInt32, Value::UInt32(v))     => encoding::uint32::encoded_len(tag, v),
        (WireType::Fixed32, Value::UInt32(v))    => encoding::fixed32::encoded_len(tag, v),
        (WireType::UInt64, Value::UInt64(v))     => encoding::uint64::encoded_len(tag, v),
        (WireType::Fixed64, Value::UInt64(v))    => encoding::fixed64::encoded_len(tag, v),
        (WireType::String, Value::String(v))     => encoding::string::encoded_len(tag, v),
        (WireType::Bytes, Value::Bytes(v))       => encoding::bytes::encoded_len(tag, v),
        // `set` never stores a mismatched value
        _ => 0,
    }
}

fn encode_scalar(field: &FieldDescriptor, value: &Value, buf: &mut impl BufMut) -> Result<(), WireError> {
    let tag = field.tag;
    match (field.wire_type, value) {
        (WireType::Bool, Value::Bool(v))         => encoding::bool::encode(tag, v, buf),
        (WireType::Double, Value::Double(v))     => encoding::double::encode(tag, v, buf),
        (WireType::Float, Value::Float(v))       => encoding::float::encode(tag, v, buf),
        (WireType::Int32, Value::Int32(v))       => encoding::int32::encode(tag, v, buf),
        (WireType::SInt32, Value::Int32(v))      => encoding::sint32::encode(tag, v, buf),
        (WireType::SFixed32, Value::Int32(v))    => encoding::sfixed32::encode(tag, v, buf),
        (WireType::Int64, Value::Int64(v))       => encoding::int64::encode(tag, v, buf),
        (WireType::SInt64, Value::Int64(v))      => encoding::sint64::encode(tag, v, buf),
        (WireType::SFixed64, Value::Int64(v))    => encoding::sfixed64::encode(tag, v, buf),
        (WireType::UInt32, Value::UInt32(v))     => encoding::uint32::encode(tag, v, buf),
        (WireType::Fixed32, Value::UInt32(v))    => encoding::fixed32::encode(tag, v, buf),
        (WireType::UInt64, Value::UInt64(v))     => encoding::uint64::encode(tag, v, buf),
        (WireType::Fixed64, Value::UInt64(v))    => encoding::fixed64::encode(tag, v, buf),
        (WireType::String, Value::String(v))     => encoding::string::encode(tag, v, buf),
        (WireType::Bytes, Value::Bytes(v))       => encoding::bytes::encode(tag, v, buf),
        (wire_type, other) => {
            return Err(WireError::TypeMismatch {
                field:    field.name.clone(),
                expected: wire_type.value_kind().to_owned(),
                actual:   other.kind().to_owned(),
            })
        }
    }
    Ok(())
}

/// Renders the set fields in protobuf text format, one `name: value` per line.
impl fmt::Display for DynamicMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (field, value) in self.set_fields() {
            match value {
                Value::List(items) => {
                    for item in items {
                        writeln!(f, "{}: {:?}", field.name, item)?;
                    }
                }
                scalar => writeln!(f, "{}: {:?}", field.name, scalar)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DynamicMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut debug = f.debug_struct(self.descriptor.full_name());
        for (field, value) in self.set_fields() {
            debug.field(&field.name, value);
        }
        debug.finish()
    }
}
