use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ProtoError, Result};

/// Field type keywords accepted in a field declaration.
pub const FIELD_TYPES: [&str; 17] = [
    "bool", "double", "float", "int32", "uint32", "int64", "uint64", "sint32", "sint64",
    "fixed32", "fixed64", "sfixed32", "sfixed64", "string", "bytes", "enum", "message",
];

/// Field property keywords; a field line must start with one of these.
pub const FIELD_PROPERTIES: [&str; 3] = ["required", "optional", "repeated"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    Double,
    Float,
    Int32,
    UInt32,
    Int64,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    String,
    Bytes,
    Enum,
    Message,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Bool     => "bool",
            FieldType::Double   => "double",
            FieldType::Float    => "float",
            FieldType::Int32    => "int32",
            FieldType::UInt32   => "uint32",
            FieldType::Int64    => "int64",
            FieldType::UInt64   => "uint64",
            FieldType::SInt32   => "sint32",
            FieldType::SInt64   => "sint64",
            FieldType::Fixed32  => "fixed32",
            FieldType::Fixed64  => "fixed64",
            FieldType::SFixed32 => "sfixed32",
            FieldType::SFixed64 => "sfixed64",
            FieldType::String   => "string",
            FieldType::Bytes    => "bytes",
            FieldType::Enum     => "enum",
            FieldType::Message  => "message",
        }
    }

    /// Enum and message fields name other definitions; nothing downstream
    /// can encode them yet.
    pub fn is_composite(&self) -> bool {
        matches!(self, FieldType::Enum | FieldType::Message)
    }
}

impl FromStr for FieldType {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self> {
        let ty = match s {
            "bool"     => FieldType::Bool,
            "double"   => FieldType::Double,
            "float"    => FieldType::Float,
            "int32"    => FieldType::Int32,
            "uint32"   => FieldType::UInt32,
            "int64"    => FieldType::Int64,
            "uint64"   => FieldType::UInt64,
            "sint32"   => FieldType::SInt32,
            "sint64"   => FieldType::SInt64,
            "fixed32"  => FieldType::Fixed32,
            "fixed64"  => FieldType::Fixed64,
            "sfixed32" => FieldType::SFixed32,
            "sfixed64" => FieldType::SFixed64,
            "string"   => FieldType::String,
            "bytes"    => FieldType::Bytes,
            "enum"     => FieldType::Enum,
            "message"  => FieldType::Message,
            other => return Err(ProtoError::Param(format!("Invalid field type [{}]", other))),
        };
        Ok(ty)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldProperty {
    Required,
    Optional,
    Repeated,
}

impl FieldProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldProperty::Required => "required",
            FieldProperty::Optional => "optional",
            FieldProperty::Repeated => "repeated",
        }
    }
}

impl FromStr for FieldProperty {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "required" => Ok(FieldProperty::Required),
            "optional" => Ok(FieldProperty::Optional),
            "repeated" => Ok(FieldProperty::Repeated),
            other => Err(ProtoError::Param(format!("Invalid field property [{}]", other))),
        }
    }
}

impl fmt::Display for FieldProperty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared member of a message. Immutable once built; the optional
/// attributes are attached with the consuming `with_*` methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    #[serde(rename = "field_name")]
    pub(crate) name:       String,
    #[serde(rename = "field_type")]
    pub(crate) field_type: FieldType,
    #[serde(rename = "field_property")]
    pub(crate) property:   FieldProperty,
    #[serde(rename = "field_sequence")]
    pub(crate) sequence:   u32,
    #[serde(rename = "field_default")]
    pub(crate) default:    Option<Value>,
    #[serde(rename = "field_comment")]
    pub(crate) comment:    String,
    #[serde(rename = "field_value")]
    pub(crate) value:      Option<Value>,
}

impl Field {
    /// Build a field from its keywords, as they appear in schema text.
    /// Fails with `ProtoError::Param` on a blank name or an unknown type or
    /// property.
    pub fn new(name: &str, field_type: &str, property: &str, sequence: u32) -> Result<Self> {
        Self::typed(name, field_type.parse()?, property.parse()?, sequence)
    }

    pub fn typed(name: &str, field_type: FieldType, property: FieldProperty, sequence: u32) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ProtoError::Param(format!("Invalid field name [{}]", name)));
        }
        Ok(Field {
            name: name.to_owned(),
            field_type,
            property,
            sequence,
            default: None,
            comment: String::new(),
            value: None,
        })
    }

    /// A JSON `null` leaves the default unset.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default).filter(|default| !default.is_null());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// A JSON `null` leaves the value unset.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value).filter(|value| !value.is_null());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn property(&self) -> FieldProperty {
        self.property
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  field_name: {}", self.name)?;
        writeln!(f, "  field_type: {}", self.field_type)?;
        writeln!(f, "  field_property: {}", self.property)?;
        writeln!(f, "  field_sequence: {}", self.sequence)?;
        writeln!(f, "  field_default: {}", display_opt(&self.default))?;
        writeln!(f, "  field_comment: {}", self.comment)?;
        writeln!(f, "  field_value: {}", display_opt(&self.value))
    }
}

fn display_opt(value: &Option<Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "null".to_owned(),
    }
}

/// One declared message type and its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    #[serde(rename = "message_name")]
    pub(crate) name:    String,
    #[serde(rename = "message_comment")]
    pub(crate) comment: Option<String>,
    #[serde(rename = "message_pkg")]
    pub(crate) package: Option<String>,
    #[serde(rename = "field_list")]
    pub(crate) fields:  Vec<Field>,
}

impl Message {
    pub fn new(name: &str, package: Option<String>) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ProtoError::Param(format!("Invalid message name [{}]", name)));
        }
        Ok(Message {
            name: name.to_owned(),
            comment: None,
            package,
            fields: Vec::new(),
        })
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Append a comment line; successive lines are joined with `\n`.
    pub fn add_comment(&mut self, comment: &str) {
        match self.comment {
            Some(ref mut existing) => {
                existing.push('\n');
                existing.push_str(comment);
            }
            None => self.comment = Some(comment.to_owned()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "message_name: {}", self.name)?;
        writeln!(f, "message_comment: {}", self.comment.as_deref().unwrap_or(""))?;
        writeln!(f, "message_pkg: {}", self.package.as_deref().unwrap_or(""))?;
        writeln!(f, "field_list:")?;
        for field in &self.fields {
            writeln!(f, "{}", field)?;
        }
        Ok(())
    }
}

/// The model of one schema file: its package and its messages keyed by
/// name. Inserting a message under an existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtoFile {
    pub(crate) package:               String,
    messages:                         Vec<Message>,
    message_name_to_index:            HashMap<String, usize>,
}

impl ProtoFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Insert `message`, returning the definition it replaced.
    pub fn insert(&mut self, message: Message) -> Option<Message> {
        match self.message_name_to_index.get(&message.name) {
            Some(&index) => Some(std::mem::replace(&mut self.messages[index], message)),
            None => {
                self.message_name_to_index.insert(message.name.clone(), self.messages.len());
                self.messages.push(message);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Message> {
        self.message_name_to_index
            .get(name)
            .map(|&index| &self.messages[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.message_name_to_index.contains_key(name)
    }

    /// Messages in first-declaration order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl fmt::Display for ProtoFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "proto package: {}", self.package)?;
        for message in &self.messages {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}
