//! SPDX store: reads and writes SPDX 2.3 documents in JSON, YAML and XML.
//!
//! Documents are restored into a `ModelStore` as an object graph and
//! flattened back out in a canonical order, so the same graph always
//! serializes to the same bytes.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use spdx_store::{Format, InMemoryStore, JsonLdContext, MultiFormatStore};
//!
//! let store = MultiFormatStore::with_format(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(JsonLdContext::spdx_2_3().unwrap()),
//!     Format::Json,
//! );
//! let input = r#"{"documentNamespace": "https://example.com/doc", "name": "doc"}"#;
//! let namespace = store.deserialize(&input.into(), false).unwrap();
//! assert_eq!(namespace, "https://example.com/doc");
//! ```

pub use spdx_core_store::{
    Codec, Error, Format, JsonLdContext, Map, ModelStore, SchemaContext, StoreLock, StoredValue,
    TypedValue, Value, Verbose,
};
pub use spdx_mem_store::InMemoryStore;
pub use spdx_multiformat_store::{
    canonically_equal, compare_nodes, compare_properties, parse_license_expression, sort_nodes,
    Deserializer, LicenseExpression, MultiFormatStore, Serializer,
};
pub use spdx_serde_store::{json_to_value, value_to_json, MultiCodec};
