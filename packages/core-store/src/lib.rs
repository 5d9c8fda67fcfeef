//! Core SPDX store: contracts shared by every layer.
//!
//! This crate defines the pieces the graph reconstructor, the flattener and
//! the codecs agree on:
//! - `Value`: format-neutral document tree (the decoded wire form)
//! - `StoredValue`: what an object property holds inside a store
//! - `ModelStore`: object storage keyed by document namespace and id
//! - `SchemaContext`: declared types and multiplicity of properties
//! - `Codec`: bytes <-> `Value` for one or more `Format`s
//!
//! # Example
//!
//! ```rust
//! use spdx_core_store::{JsonLdContext, SchemaContext};
//!
//! let context = JsonLdContext::spdx_2_3().unwrap();
//! assert!(context.is_multi_valued("documentDescribes"));
//! assert_eq!(context.type_of("relatedSpdxElement").as_deref(), Some("SpdxElement"));
//! ```

pub use bytes::Bytes;

pub mod enums;
mod error;
mod format;
pub mod schema;
mod stored;
mod traits;
mod value;
pub mod vocab;

pub use error::Error;
pub use format::{Format, Verbose};
pub use schema::{JsonLdContext, Primitive, TypeClass};
pub use stored::{is_anonymous_id, IdType, IndividualUriValue, StoredValue, TypedValue};
pub use traits::{Codec, ModelStore, SchemaContext, StoreLock};
pub use value::{Map, Value};
