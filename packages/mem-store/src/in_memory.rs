//! In-memory model store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lazy_static::lazy_static;
use regex::Regex;

use spdx_core_store::vocab::{ANON_PREFIX, DOCUMENT_REF_PREFIX, LICENSE_REF_PREFIX, SPDX_REF_PREFIX};
use spdx_core_store::{
    is_anonymous_id, Error, IdType, ModelStore, StoreLock, StoredValue, TypedValue,
};

#[derive(Clone, Debug)]
enum PropertySlot {
    Single(StoredValue),
    Collection(Vec<StoredValue>),
}

#[derive(Clone, Debug)]
struct StoredObject {
    type_name: String,
    properties: BTreeMap<String, PropertySlot>,
}

type Documents = BTreeMap<String, BTreeMap<String, StoredObject>>;

/// A [`ModelStore`] that keeps every object in memory.
///
/// Documents and objects are kept in sorted maps, so `all_items` and
/// `property_value_names` iterate in a stable order.
///
/// # Example
///
/// ```rust
/// use spdx_mem_store::InMemoryStore;
/// use spdx_core_store::{ModelStore, StoredValue};
///
/// let store = InMemoryStore::new();
/// store.create("https://example.com/doc", "SPDXRef-1", "Package").unwrap();
/// store
///     .set_value("https://example.com/doc", "SPDXRef-1", "name", StoredValue::from("zlib"))
///     .unwrap();
///
/// let name = store.get_value("https://example.com/doc", "SPDXRef-1", "name").unwrap();
/// assert_eq!(name, Some(StoredValue::from("zlib")));
/// ```
pub struct InMemoryStore {
    documents: RwLock<Documents>,
    critical_section: RwLock<()>,
    next_generated: AtomicU64,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            critical_section: RwLock::new(()),
            next_generated: AtomicU64::new(0),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Documents>, Error> {
        self.documents.read().map_err(|e| Error::Lock {
            message: e.to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Documents>, Error> {
        self.documents.write().map_err(|e| Error::Lock {
            message: e.to_string(),
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(document_uri: &str, id: &str) -> Error {
    Error::missing_element(format!("object {} not found in {}", id, document_uri))
}

fn object<'a>(docs: &'a Documents, document_uri: &str, id: &str) -> Result<&'a StoredObject, Error> {
    docs.get(document_uri)
        .and_then(|objects| objects.get(id))
        .ok_or_else(|| missing(document_uri, id))
}

fn object_mut<'a>(
    docs: &'a mut Documents,
    document_uri: &str,
    id: &str,
) -> Result<&'a mut StoredObject, Error> {
    docs.get_mut(document_uri)
        .and_then(|objects| objects.get_mut(id))
        .ok_or_else(|| missing(document_uri, id))
}

impl ModelStore for InMemoryStore {
    fn exists(&self, document_uri: &str, id: &str) -> Result<bool, Error> {
        let docs = self.read()?;
        Ok(docs
            .get(document_uri)
            .is_some_and(|objects| objects.contains_key(id)))
    }

    fn create(&self, document_uri: &str, id: &str, type_name: &str) -> Result<(), Error> {
        let mut docs = self.write()?;
        let objects = docs.entry(document_uri.to_string()).or_default();
        match objects.get(id) {
            Some(existing) if existing.type_name == type_name => Ok(()),
            Some(existing) => Err(Error::invalid_type(format!(
                "{} already exists with type {}, not {}",
                id, existing.type_name, type_name
            ))),
            None => {
                log::debug!("Creating {} {} in {}", type_name, id, document_uri);
                objects.insert(
                    id.to_string(),
                    StoredObject {
                        type_name: type_name.to_string(),
                        properties: BTreeMap::new(),
                    },
                );
                Ok(())
            }
        }
    }

    fn get_value(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<Option<StoredValue>, Error> {
        let docs = self.read()?;
        match object(&docs, document_uri, id)?.properties.get(property) {
            None => Ok(None),
            Some(PropertySlot::Single(value)) => Ok(Some(value.clone())),
            Some(PropertySlot::Collection(_)) => Err(Error::invalid_type(format!(
                "property {} of {} is a collection",
                property, id
            ))),
        }
    }

    fn set_value(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> Result<(), Error> {
        let mut docs = self.write()?;
        object_mut(&mut docs, document_uri, id)?
            .properties
            .insert(property.to_string(), PropertySlot::Single(value));
        Ok(())
    }

    fn add_value_to_collection(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> Result<bool, Error> {
        let mut docs = self.write()?;
        let slot = object_mut(&mut docs, document_uri, id)?
            .properties
            .entry(property.to_string())
            .or_insert_with(|| PropertySlot::Collection(Vec::new()));
        match slot {
            PropertySlot::Collection(values) => {
                if values.contains(&value) {
                    Ok(false)
                } else {
                    values.push(value);
                    Ok(true)
                }
            }
            PropertySlot::Single(_) => Err(Error::invalid_type(format!(
                "property {} of {} is not a collection",
                property, id
            ))),
        }
    }

    fn clear_value_collection(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<(), Error> {
        let mut docs = self.write()?;
        object_mut(&mut docs, document_uri, id)?
            .properties
            .insert(property.to_string(), PropertySlot::Collection(Vec::new()));
        Ok(())
    }

    fn list_values(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<Vec<StoredValue>, Error> {
        let docs = self.read()?;
        match object(&docs, document_uri, id)?.properties.get(property) {
            None => Ok(Vec::new()),
            Some(PropertySlot::Collection(values)) => Ok(values.clone()),
            Some(PropertySlot::Single(_)) => Err(Error::invalid_type(format!(
                "property {} of {} is not a collection",
                property, id
            ))),
        }
    }

    fn is_collection_property(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<bool, Error> {
        let docs = self.read()?;
        Ok(matches!(
            object(&docs, document_uri, id)?.properties.get(property),
            Some(PropertySlot::Collection(_))
        ))
    }

    fn property_value_names(&self, document_uri: &str, id: &str) -> Result<Vec<String>, Error> {
        let docs = self.read()?;
        Ok(object(&docs, document_uri, id)?
            .properties
            .iter()
            .filter(|(_, slot)| match slot {
                PropertySlot::Collection(values) => !values.is_empty(),
                PropertySlot::Single(_) => true,
            })
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn id_type(&self, id: &str) -> IdType {
        lazy_static! {
            static ref SPDX_ID: Regex = Regex::new(r"^SPDXRef-[A-Za-z0-9.\-]+$").unwrap();
            static ref LICENSE_REF: Regex = Regex::new(r"^LicenseRef-[A-Za-z0-9.\-+]+$").unwrap();
            static ref DOCUMENT_REF: Regex =
                Regex::new(r"^DocumentRef-[A-Za-z0-9.\-+]+$").unwrap();
            static ref LISTED_ID: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.\-+]*$").unwrap();
        }

        if is_anonymous_id(id) {
            IdType::Anonymous
        } else if SPDX_ID.is_match(id) {
            IdType::SpdxId
        } else if LICENSE_REF.is_match(id) {
            IdType::LicenseRef
        } else if DOCUMENT_REF.is_match(id) {
            IdType::DocumentRef
        } else if LISTED_ID.is_match(id) {
            IdType::ListedLicense
        } else {
            IdType::Unknown
        }
    }

    fn next_id(&self, id_type: IdType, document_uri: &str) -> Result<String, Error> {
        let prefix = match id_type {
            IdType::Anonymous => ANON_PREFIX,
            IdType::SpdxId => SPDX_REF_PREFIX,
            IdType::LicenseRef => LICENSE_REF_PREFIX,
            IdType::DocumentRef => DOCUMENT_REF_PREFIX,
            other => {
                return Err(Error::Other {
                    message: format!("cannot generate an identifier of kind {:?}", other),
                })
            }
        };
        let docs = self.read()?;
        let objects = docs.get(document_uri);
        loop {
            let n = self.next_generated.fetch_add(1, Ordering::Relaxed);
            let id = if id_type == IdType::Anonymous {
                format!("{}{}", prefix, n)
            } else {
                format!("{}gnrtd{}", prefix, n)
            };
            if !objects.is_some_and(|objects| objects.contains_key(&id)) {
                return Ok(id);
            }
        }
    }

    fn all_items(
        &self,
        document_uri: Option<&str>,
        type_name: Option<&str>,
    ) -> Result<Vec<TypedValue>, Error> {
        let docs = self.read()?;
        let mut items = Vec::new();
        for (uri, objects) in docs.iter() {
            if document_uri.is_some_and(|wanted| wanted != uri) {
                continue;
            }
            for (id, obj) in objects {
                if type_name.is_some_and(|wanted| wanted != obj.type_name) {
                    continue;
                }
                items.push(TypedValue::new(id.clone(), obj.type_name.clone(), uri.clone()));
            }
        }
        Ok(items)
    }

    fn delete(&self, document_uri: &str, id: &str) -> Result<(), Error> {
        let mut docs = self.write()?;
        let objects = docs
            .get_mut(document_uri)
            .ok_or_else(|| missing(document_uri, id))?;
        objects.remove(id).ok_or_else(|| missing(document_uri, id))?;
        if objects.is_empty() {
            docs.remove(document_uri);
        }
        Ok(())
    }

    fn enter_critical_section(
        &self,
        document_uri: &str,
        exclusive: bool,
    ) -> Result<StoreLock<'_>, Error> {
        log::debug!(
            "Entering {} critical section for {}",
            if exclusive { "exclusive" } else { "shared" },
            document_uri
        );
        if exclusive {
            StoreLock::exclusive(&self.critical_section)
        } else {
            StoreLock::shared(&self.critical_section)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const DOC: &str = "https://example.com/doc";

    #[test]
    fn create_and_read_back() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        assert!(store.exists(DOC, "SPDXRef-1").unwrap());
        assert!(!store.exists(DOC, "SPDXRef-2").unwrap());
        assert!(!store.exists("other", "SPDXRef-1").unwrap());
    }

    #[test]
    fn create_is_idempotent_for_same_type() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        store
            .set_value(DOC, "SPDXRef-1", "name", StoredValue::from("zlib"))
            .unwrap();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        assert_eq!(
            store.get_value(DOC, "SPDXRef-1", "name").unwrap(),
            Some(StoredValue::from("zlib"))
        );
    }

    #[test]
    fn create_with_different_type_fails() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        let err = store.create(DOC, "SPDXRef-1", "File").unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }

    #[test]
    fn get_value_of_missing_object_fails() {
        let store = InMemoryStore::new();
        let err = store.get_value(DOC, "SPDXRef-1", "name").unwrap_err();
        assert!(matches!(err, Error::MissingElement { .. }));
    }

    #[test]
    fn unset_property_reads_none() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        assert_eq!(store.get_value(DOC, "SPDXRef-1", "name").unwrap(), None);
        assert!(store.list_values(DOC, "SPDXRef-1", "checksum").unwrap().is_empty());
    }

    #[test]
    fn collections_reject_duplicates_and_keep_order() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        assert!(store
            .add_value_to_collection(DOC, "SPDXRef-1", "attributionText", "b".into())
            .unwrap());
        assert!(store
            .add_value_to_collection(DOC, "SPDXRef-1", "attributionText", "a".into())
            .unwrap());
        assert!(!store
            .add_value_to_collection(DOC, "SPDXRef-1", "attributionText", "b".into())
            .unwrap());

        let values = store.list_values(DOC, "SPDXRef-1", "attributionText").unwrap();
        assert_eq!(values, vec![StoredValue::from("b"), StoredValue::from("a")]);
        assert!(store
            .is_collection_property(DOC, "SPDXRef-1", "attributionText")
            .unwrap());
    }

    #[test]
    fn single_and_collection_do_not_mix() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        store
            .set_value(DOC, "SPDXRef-1", "name", "zlib".into())
            .unwrap();
        assert!(store
            .add_value_to_collection(DOC, "SPDXRef-1", "name", "x".into())
            .is_err());
        assert!(store.list_values(DOC, "SPDXRef-1", "name").is_err());

        store
            .add_value_to_collection(DOC, "SPDXRef-1", "checksum", "x".into())
            .unwrap();
        assert!(store.get_value(DOC, "SPDXRef-1", "checksum").is_err());
    }

    #[test]
    fn clear_collection_hides_property() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        store
            .add_value_to_collection(DOC, "SPDXRef-1", "checksum", "x".into())
            .unwrap();
        store
            .set_value(DOC, "SPDXRef-1", "name", "zlib".into())
            .unwrap();
        assert_eq!(
            store.property_value_names(DOC, "SPDXRef-1").unwrap(),
            vec!["checksum".to_string(), "name".to_string()]
        );

        store
            .clear_value_collection(DOC, "SPDXRef-1", "checksum")
            .unwrap();
        assert_eq!(
            store.property_value_names(DOC, "SPDXRef-1").unwrap(),
            vec!["name".to_string()]
        );
        assert!(store
            .is_collection_property(DOC, "SPDXRef-1", "checksum")
            .unwrap());
    }

    #[test]
    fn classify_identifiers() {
        let store = InMemoryStore::new();
        assert_eq!(store.id_type("SPDXRef-Package-1.2"), IdType::SpdxId);
        assert_eq!(store.id_type("LicenseRef-Beer"), IdType::LicenseRef);
        assert_eq!(store.id_type("DocumentRef-spdx-tool"), IdType::DocumentRef);
        assert_eq!(store.id_type("Apache-2.0"), IdType::ListedLicense);
        assert_eq!(store.id_type("GPL-2.0+"), IdType::ListedLicense);
        assert_eq!(store.id_type("__anon__3"), IdType::Anonymous);
        assert_eq!(store.id_type("has space"), IdType::Unknown);
    }

    #[test]
    fn generated_anonymous_ids_classify_as_anonymous() {
        let store = InMemoryStore::new();
        let id = store.next_id(IdType::Anonymous, DOC).unwrap();
        assert!(is_anonymous_id(&id));
        assert_eq!(store.id_type(&id), IdType::Anonymous);
    }

    #[test]
    fn generated_ids_are_fresh() {
        let store = InMemoryStore::new();
        let first = store.next_id(IdType::Anonymous, DOC).unwrap();
        let second = store.next_id(IdType::Anonymous, DOC).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.id_type(&first), IdType::Anonymous);

        let spdx = store.next_id(IdType::SpdxId, DOC).unwrap();
        assert_eq!(store.id_type(&spdx), IdType::SpdxId);
        assert!(store.next_id(IdType::ListedLicense, DOC).is_err());
    }

    #[test]
    fn all_items_filters_by_document_and_type() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        store.create(DOC, "SPDXRef-2", "File").unwrap();
        store.create("other", "SPDXRef-1", "Package").unwrap();

        assert_eq!(store.all_items(None, None).unwrap().len(), 3);
        assert_eq!(store.all_items(Some(DOC), None).unwrap().len(), 2);
        let packages = store.all_items(None, Some("Package")).unwrap();
        assert_eq!(packages.len(), 2);
        let files = store.all_items(Some(DOC), Some("File")).unwrap();
        assert_eq!(files, vec![TypedValue::new("SPDXRef-2", "File", DOC)]);
    }

    #[test]
    fn delete_removes_object() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        store.delete(DOC, "SPDXRef-1").unwrap();
        assert!(!store.exists(DOC, "SPDXRef-1").unwrap());
        assert!(store.all_items(Some(DOC), None).unwrap().is_empty());
        assert!(store.delete(DOC, "SPDXRef-1").is_err());
    }

    #[test]
    fn exclusive_section_blocks_other_sections() {
        let store = InMemoryStore::new();
        let guard = store.enter_critical_section(DOC, true).unwrap();
        assert!(guard.is_exclusive());
        assert!(store.critical_section.try_read().is_err());
        drop(guard);

        let first = store.enter_critical_section(DOC, false).unwrap();
        let second = store.enter_critical_section(DOC, false).unwrap();
        assert!(!first.is_exclusive() && !second.is_exclusive());
    }

    #[test]
    fn shared_store_behind_arc() {
        let store = Arc::new(InMemoryStore::new());
        let shared: &dyn ModelStore = &store;
        shared.create(DOC, "SPDXRef-1", "Package").unwrap();
        assert!(store.exists(DOC, "SPDXRef-1").unwrap());
    }
}
