//! Dynamic message support for protoline schemas: a descriptor builder that
//! turns a flat list of `(name, wire type, label, tag)` entries into a
//! message layout, and an encodable instance that serializes values with the
//! protobuf wire format.
//!
//! ```
//! use protoline_wire::*;
//!
//! let descriptor = DescriptorBuilder::new("pkg", "Test3")
//!     .field("first_field", WireType::String, Label::Required, 1)
//!     .field("second_field", WireType::Int32, Label::Optional, 2)
//!     .build()
//!     .unwrap();
//!
//! let mut message = DynamicMessage::new(&descriptor);
//! message.set("first_field", Value::from("hello,world")).unwrap();
//! message.set("second_field", Value::Int32(10086)).unwrap();
//!
//! assert_eq!(message.encoded_len(), 16);
//! let bytes = message.encode_to_vec().unwrap();
//! assert_eq!(&bytes[..2], &[0x0a, 0x0b]);
//! assert_eq!(&bytes[13..], &[0x10, 0xe6, 0x4e]);
//! ```

pub mod descriptor;
pub mod error;
pub mod message;
pub mod value;

pub use descriptor::*;
pub use error::*;
pub use message::*;
pub use value::*;
