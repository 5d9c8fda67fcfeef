//! Bytes in, bytes out: SPDX documents in JSON, YAML or XML over a
//! [`ModelStore`].

use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;

use spdx_core_store::vocab::{CLASS_SPDX_DOCUMENT, DOCUMENT_ID, PROP_DOCUMENT_NAMESPACE};
use spdx_core_store::{Codec, Error, Format, ModelStore, SchemaContext, Value, Verbose};
use spdx_serde_store::MultiCodec;

use crate::deserializer::Deserializer;
use crate::serializer::Serializer;

/// Reads and writes SPDX documents in every supported [`Format`].
///
/// Several documents may live in one store, told apart by namespace.
/// Serializing without a namespace writes every document: one as an object,
/// several as an array.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use spdx_core_store::{Format, JsonLdContext};
/// use spdx_mem_store::InMemoryStore;
/// use spdx_multiformat_store::MultiFormatStore;
///
/// let store = MultiFormatStore::with_format(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(JsonLdContext::spdx_2_3().unwrap()),
///     Format::Json,
/// );
///
/// let input = br#"{"SPDXID": "SPDXRef-DOCUMENT", "name": "example",
///                  "documentNamespace": "https://example.com/doc"}"#;
/// let namespace = store.deserialize(&input.to_vec().into(), false).unwrap();
/// assert_eq!(namespace, "https://example.com/doc");
///
/// let output = store.serialize(Some(&namespace)).unwrap();
/// assert!(std::str::from_utf8(&output).unwrap().contains("\"name\":\"example\""));
/// ```
pub struct MultiFormatStore {
    store: Arc<dyn ModelStore>,
    schema: Arc<dyn SchemaContext>,
    codec: MultiCodec,
    format: Format,
    verbose: Verbose,
}

impl MultiFormatStore {
    pub fn new(
        store: Arc<dyn ModelStore>,
        schema: Arc<dyn SchemaContext>,
        format: Format,
        verbose: Verbose,
    ) -> Self {
        Self {
            store,
            schema,
            codec: MultiCodec::all_formats(),
            format,
            verbose,
        }
    }

    /// A store writing compact documents in `format`.
    pub fn with_format(
        store: Arc<dyn ModelStore>,
        schema: Arc<dyn SchemaContext>,
        format: Format,
    ) -> Self {
        Self::new(store, schema, format, Verbose::default())
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    pub fn verbose(&self) -> Verbose {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: Verbose) {
        self.verbose = verbose;
    }

    /// The underlying model store.
    pub fn store(&self) -> &Arc<dyn ModelStore> {
        &self.store
    }

    /// Serialize one document, or every document when `namespace` is `None`.
    pub fn serialize(&self, namespace: Option<&str>) -> Result<Bytes, Error> {
        let serializer = Serializer::new(&*self.store, self.verbose);
        let tree = match namespace {
            Some(namespace) => serializer.document_to_tree(namespace)?,
            None => {
                let namespaces = self.document_namespaces()?;
                match namespaces.as_slice() {
                    [] => {
                        log::warn!("No SPDX documents to serialize");
                        Value::array()
                    }
                    [only] => serializer.document_to_tree(only)?,
                    several => Value::Array(
                        several
                            .iter()
                            .map(|namespace| serializer.document_to_tree(namespace))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                }
            }
        };
        self.codec.encode(&tree, &self.format)
    }

    /// Restore every document in `bytes` and return the first namespace.
    ///
    /// Only compact documents can be read. A namespace that is already in
    /// the store is an error unless `overwrite` is set, in which case it is
    /// cleared first under the same critical section.
    pub fn deserialize(&self, bytes: &Bytes, overwrite: bool) -> Result<String, Error> {
        if self.verbose != Verbose::Compact {
            return Err(Error::UnsupportedVerbosity {
                verbose: self.verbose,
            });
        }

        let documents = match self.codec.decode(bytes, &self.format)? {
            Value::Array(documents) => documents,
            single => vec![single],
        };
        let mut namespaces: Vec<&str> = Vec::with_capacity(documents.len());
        for document in &documents {
            let namespace = document
                .get_str(PROP_DOCUMENT_NAMESPACE)
                .filter(|namespace| !namespace.is_empty())
                .ok_or_else(|| Error::MissingDocument {
                    message: format!("document has no {}", PROP_DOCUMENT_NAMESPACE),
                })?;
            if namespaces.contains(&namespace) {
                return Err(Error::AlreadyExists {
                    namespace: namespace.to_string(),
                });
            }
            namespaces.push(namespace);
        }
        let first = match namespaces.first() {
            Some(first) => first.to_string(),
            None => {
                return Err(Error::MissingDocument {
                    message: "no documents found".to_string(),
                })
            }
        };

        let _lock = self.store.enter_critical_section(&first, true)?;
        let existing = self.document_uris()?;
        for namespace in &namespaces {
            if existing.contains(*namespace) {
                if !overwrite {
                    return Err(Error::AlreadyExists {
                        namespace: namespace.to_string(),
                    });
                }
                self.clear_locked(namespace)?;
            }
        }

        let deserializer = Deserializer::new(&*self.store, &*self.schema);
        for (namespace, document) in namespaces.iter().zip(&documents) {
            deserializer.store_document_locked(namespace, document)?;
        }
        Ok(first)
    }

    /// Delete every object under `namespace`.
    pub fn clear(&self, namespace: &str) -> Result<(), Error> {
        let _lock = self.store.enter_critical_section(namespace, true)?;
        self.clear_locked(namespace)
    }

    fn clear_locked(&self, namespace: &str) -> Result<(), Error> {
        let items = self.store.all_items(Some(namespace), None)?;
        log::debug!("Clearing {} objects from {}", items.len(), namespace);
        for item in items {
            self.store.delete(namespace, &item.id)?;
        }
        Ok(())
    }

    /// Namespaces holding at least one object.
    pub fn document_uris(&self) -> Result<BTreeSet<String>, Error> {
        Ok(self
            .store
            .all_items(None, None)?
            .into_iter()
            .map(|item| item.document_uri)
            .collect())
    }

    /// Namespaces holding an SPDX document.
    fn document_namespaces(&self) -> Result<Vec<String>, Error> {
        Ok(self
            .store
            .all_items(None, Some(CLASS_SPDX_DOCUMENT))?
            .into_iter()
            .filter(|item| item.id == DOCUMENT_ID)
            .map(|item| item.document_uri)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdx_core_store::JsonLdContext;
    use spdx_mem_store::InMemoryStore;

    const DOC: &str = "https://example.com/doc";

    fn store(format: Format) -> MultiFormatStore {
        MultiFormatStore::with_format(
            Arc::new(InMemoryStore::new()),
            Arc::new(JsonLdContext::spdx_2_3().unwrap()),
            format,
        )
    }

    fn document(namespace: &str) -> String {
        format!(
            r#"{{"SPDXID": "SPDXRef-DOCUMENT", "name": "doc", "documentNamespace": "{}"}}"#,
            namespace
        )
    }

    #[test]
    fn defaults_to_compact() {
        let store = store(Format::Yaml);
        assert_eq!(store.format(), Format::Yaml);
        assert_eq!(store.verbose(), Verbose::Compact);
    }

    #[test]
    fn refuses_to_overwrite_by_default() {
        let store = store(Format::Json);
        let bytes = Bytes::from(document(DOC));
        store.deserialize(&bytes, false).unwrap();

        let err = store.deserialize(&bytes, false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { ref namespace } if namespace == DOC));
        assert_eq!(store.deserialize(&bytes, true).unwrap(), DOC);
    }

    #[test]
    fn overwrite_replaces_previous_objects() {
        let store = store(Format::Json);
        let with_package = Bytes::from(format!(
            r#"{{"documentNamespace": "{}", "packages": [{{"SPDXID": "SPDXRef-P"}}]}}"#,
            DOC
        ));
        store.deserialize(&with_package, false).unwrap();
        store.deserialize(&Bytes::from(document(DOC)), true).unwrap();
        assert!(!store.store().exists(DOC, "SPDXRef-P").unwrap());
    }

    #[test]
    fn only_compact_can_be_read() {
        let mut store = store(Format::Json);
        store.set_verbose(Verbose::Full);
        let err = store
            .deserialize(&Bytes::from(document(DOC)), false)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVerbosity { .. }));
    }

    #[test]
    fn namespace_is_required() {
        let store = store(Format::Json);
        let err = store
            .deserialize(&Bytes::from(r#"{"name": "doc"}"#), false)
            .unwrap_err();
        assert!(matches!(err, Error::MissingDocument { .. }));
        let err = store.deserialize(&Bytes::from("[]"), false).unwrap_err();
        assert!(matches!(err, Error::MissingDocument { .. }));
    }

    #[test]
    fn several_documents_serialize_as_array() {
        let store = store(Format::Json);
        let input = format!("[{}, {}]", document("https://a.org/1"), document("https://a.org/2"));
        let first = store.deserialize(&Bytes::from(input), false).unwrap();
        assert_eq!(first, "https://a.org/1");
        assert_eq!(store.document_uris().unwrap().len(), 2);

        let output = store.serialize(None).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn empty_store_serializes_empty_array() {
        let store = store(Format::Json);
        assert_eq!(&store.serialize(None).unwrap()[..], b"[]");
    }

    #[test]
    fn clear_removes_namespace() {
        let store = store(Format::Json);
        store.deserialize(&Bytes::from(document(DOC)), false).unwrap();
        store.clear(DOC).unwrap();
        assert!(store.document_uris().unwrap().is_empty());
        assert!(matches!(
            store.serialize(Some(DOC)),
            Err(Error::MissingDocument { .. })
        ));
    }
}
