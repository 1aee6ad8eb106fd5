use std::collections::HashMap;
use std::fmt;

use crate::{error::WireError, value::Value};

/// Largest field number allowed by the protobuf wire format.
pub const MAX_TAG: u32 = (1 << 29) - 1;

/// Field numbers reserved for the protobuf implementation itself.
pub const RESERVED_TAGS: std::ops::RangeInclusive<u32> = 19000..=19999;

/// Scalar wire kinds a flat message field can be encoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Bool,
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    String,
    Bytes,
}

impl WireType {
    pub fn name(&self) -> &'static str {
        match self {
            WireType::Bool     => "bool",
            WireType::Double   => "double",
            WireType::Float    => "float",
            WireType::Int32    => "int32",
            WireType::Int64    => "int64",
            WireType::UInt32   => "uint32",
            WireType::UInt64   => "uint64",
            WireType::SInt32   => "sint32",
            WireType::SInt64   => "sint64",
            WireType::Fixed32  => "fixed32",
            WireType::Fixed64  => "fixed64",
            WireType::SFixed32 => "sfixed32",
            WireType::SFixed64 => "sfixed64",
            WireType::String   => "string",
            WireType::Bytes    => "bytes",
        }
    }

    /// The [Value](enum.Value.html) kind that carries this wire type.
    pub fn value_kind(&self) -> &'static str {
        match self {
            WireType::Bool => "bool",
            WireType::Double => "double",
            WireType::Float => "float",
            WireType::Int32 | WireType::SInt32 | WireType::SFixed32 => "int32",
            WireType::Int64 | WireType::SInt64 | WireType::SFixed64 => "int64",
            WireType::UInt32 | WireType::Fixed32 => "uint32",
            WireType::UInt64 | WireType::Fixed64 => "uint64",
            WireType::String => "string",
            WireType::Bytes => "bytes",
        }
    }

    /// Returns true when `value` is a scalar of the matching kind.
    pub fn accepts(&self, value: &Value) -> bool {
        !matches!(value, Value::List(_)) && value.kind() == self.value_kind()
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Required,
    Optional,
    Repeated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name:      String,
    pub wire_type: WireType,
    pub label:     Label,
    pub tag:       u32,
}

/// Field layout of one message, with fields kept in ascending tag order so
/// encoding walks them in wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDescriptor {
    full_name:           String,
    fields:              Vec<FieldDescriptor>,
    field_name_to_index: HashMap<String, usize>,
}

impl MessageDescriptor {
    /// `package.Name`, or just `Name` when the package is empty.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_name_to_index.get(name).copied()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_index(name).map(|index| &self.fields[index])
    }
}

/// Collects `(name, wire type, label, tag)` entries and validates them into
/// a [MessageDescriptor](struct.MessageDescriptor.html).
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    package: String,
    name:    String,
    fields:  Vec<FieldDescriptor>,
}

impl DescriptorBuilder {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        DescriptorBuilder {
            package: package.into(),
            name:    name.into(),
            fields:  Vec::new(),
        }
    }

    /// Chaining form of [push_field](#method.push_field).
    pub fn field(mut self, name: impl Into<String>, wire_type: WireType, label: Label, tag: u32) -> Self {
        self.push_field(name, wire_type, label, tag);
        self
    }

    pub fn push_field(&mut self, name: impl Into<String>, wire_type: WireType, label: Label, tag: u32) {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            wire_type,
            label,
            tag,
        });
    }

    pub fn build(self) -> Result<MessageDescriptor, WireError> {
        if self.name.trim().is_empty() {
            return Err(WireError::EmptyName);
        }
        let full_name = if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        };

        let mut fields = self.fields;
        for (i, field) in fields.iter().enumerate() {
            if field.tag == 0 || field.tag > MAX_TAG || RESERVED_TAGS.contains(&field.tag) {
                return Err(WireError::InvalidTag {
                    field: field.name.clone(),
                    tag:   field.tag,
                });
            }
            for earlier in &fields[..i] {
                if earlier.name == field.name {
                    return Err(WireError::DuplicateField {
                        message: full_name.clone(),
                        field:   field.name.clone(),
                    });
                }
                if earlier.tag == field.tag {
                    return Err(WireError::DuplicateTag {
                        message: full_name.clone(),
                        tag:     field.tag,
                    });
                }
            }
        }

        fields.sort_by_key(|field| field.tag);
        let field_name_to_index = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.name.clone(), i))
            .collect();

        Ok(MessageDescriptor {
            full_name,
            fields,
            field_name_to_index,
        })
    }
}
