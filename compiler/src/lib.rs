//! protoline-compiler
//!
//! This crate implements:
//!  1) A normalizer that rewrites schema text into canonical lines,
//!  2) A line classifier and a field tokenizer,
//!  3) The schema builder automaton (`SchemaBuilder`) producing a `ProtoFile`,
//!  4) The data model (`Field`, `Message`, `ProtoFile`) and its JSON bridge,
//!  5) A bridge from a `Message` with example values to protobuf wire bytes.
//!
//! ```
//! use protoline_compiler::{parse_schema, JsonRecord};
//!
//! let file = parse_schema("package pkg;\nmessage Test1 {\n  required string name = 1; //the name\n}\n").unwrap();
//! let message = file.get("Test1").unwrap();
//! assert_eq!(message.package(), Some("pkg"));
//! assert_eq!(message.fields()[0].comment(), "the name");
//! assert!(message.to_json_string().unwrap().contains(r#""message_name":"Test1""#));
//! ```

pub mod error;
pub mod types;
pub mod utils;
pub mod normalizer;
pub mod classifier;
pub mod tokenizer;
pub mod parser;
pub mod verifier;
pub mod json;
pub mod traits;
pub mod compiler;

pub use compiler::{encode_message, parse_file, parse_file_with, parse_schema, parse_schema_with, EncodedMessage};
pub use error::{ProtoError, Result};
pub use parser::{ParseOptions, SchemaBuilder};
pub use traits::JsonRecord;
pub use types::{Field, FieldProperty, FieldType, Message, ProtoFile};
