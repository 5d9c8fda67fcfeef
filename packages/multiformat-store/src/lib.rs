//! Multi-format SPDX store
//!
//! Maps SPDX documents between the object graph held in a `ModelStore` and
//! the trees JSON, YAML and XML decode to:
//! - `Deserializer`: rebuilds the graph from a tree, resolving forward
//!   references and collapsing duplicate relationships
//! - `Serializer`: flattens the graph into a deterministically ordered tree
//! - `MultiFormatStore`: bytes in and out, overwrite protection, several
//!   documents per stream
//! - `compare_nodes`: the canonical order used to sort every emitted array
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use spdx_core_store::{Format, JsonLdContext};
//! use spdx_mem_store::InMemoryStore;
//! use spdx_multiformat_store::MultiFormatStore;
//!
//! let store = MultiFormatStore::with_format(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(JsonLdContext::spdx_2_3().unwrap()),
//!     Format::Yaml,
//! );
//! let yaml = "documentNamespace: https://example.com/doc\n\
//!             packages:\n  - SPDXID: SPDXRef-zlib\n    name: zlib\n\
//!             documentDescribes: [SPDXRef-zlib]\n";
//! let namespace = store.deserialize(&yaml.into(), false).unwrap();
//!
//! let output = store.serialize(Some(&namespace)).unwrap();
//! let text = std::str::from_utf8(&output).unwrap();
//! assert!(text.contains("documentDescribes"));
//! assert!(!text.contains("relationships"));
//! ```

mod coercion;
mod comparator;
mod deserializer;
pub mod external;
mod license;
mod multi_format;
pub mod naming;
mod property_order;
mod serializer;

pub use comparator::{canonically_equal, compare_nodes, sort_nodes};
pub use deserializer::Deserializer;
pub use license::{parse_license_expression, LicenseExpression};
pub use multi_format::MultiFormatStore;
pub use property_order::compare_properties;
pub use serializer::Serializer;
