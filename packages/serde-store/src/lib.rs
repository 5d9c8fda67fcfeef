//! Serde Integration for SPDX stores
//!
//! This layer turns serialized documents into `Value` trees and back. It adds:
//! - `JsonCodec`: compact and pretty JSON
//! - `YamlCodec`: YAML, via the JSON data model
//! - `XmlCodec`: XML with a named root element
//! - `MultiCodec`: routes each `Format` to the codec that supports it
//! - Value <-> serde_json conversions
//!
//! # Example
//!
//! ```rust
//! use spdx_serde_store::{Codec, Format, MultiCodec, Value};
//!
//! let codec = MultiCodec::default();
//! let value = codec.decode(&"name: zlib".into(), &Format::Yaml).unwrap();
//! assert_eq!(value.get_str("name"), Some("zlib"));
//! ```

pub use bytes::Bytes;

mod codec;
mod convert;
mod xml;
mod yaml;

pub use codec::{JsonCodec, MultiCodec};
pub use convert::{json_to_value, value_to_json};
pub use xml::XmlCodec;
pub use yaml::YamlCodec;

// Re-export core types for convenience
pub use spdx_core_store::{Codec, Error, Format, Value};
