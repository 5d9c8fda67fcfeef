//! Core traits: ModelStore, SchemaContext, Codec.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;

use crate::{Error, Format, IdType, StoredValue, TypedValue, Value};

/// Object storage keyed by (document namespace, object id).
///
/// Every object has a type name and a set of named properties. A property
/// holds either a single [`StoredValue`] or a collection of them.
///
/// Methods take `&self`; implementations use interior mutability so a store
/// can be shared behind an `Arc` between readers and writers.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn ModelStore>`.
pub trait ModelStore: Send + Sync {
    /// Check whether an object exists.
    fn exists(&self, document_uri: &str, id: &str) -> Result<bool, Error>;

    /// Create an object.
    ///
    /// Creating an object that already exists with the same type is a no-op.
    /// Creating it with a different type is an error.
    fn create(&self, document_uri: &str, id: &str, type_name: &str) -> Result<(), Error>;

    /// Read a single-valued property.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The property is not set.
    /// * `Ok(Some(value))` - The property value.
    /// * `Err(Error)` - The object is missing or the property is a collection.
    fn get_value(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<Option<StoredValue>, Error>;

    /// Set a single-valued property, replacing any previous value.
    fn set_value(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> Result<(), Error>;

    /// Append to a collection property.
    ///
    /// Returns `false` when the collection already contained an equal value;
    /// collections never hold duplicates.
    fn add_value_to_collection(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> Result<bool, Error>;

    /// Empty a collection property.
    fn clear_value_collection(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<(), Error>;

    /// All members of a collection property, in insertion order.
    ///
    /// A property that was never set lists as empty.
    fn list_values(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<Vec<StoredValue>, Error>;

    /// Check whether a property holds a collection.
    fn is_collection_property(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<bool, Error>;

    /// Names of every property that has a value.
    fn property_value_names(&self, document_uri: &str, id: &str) -> Result<Vec<String>, Error>;

    /// Classify an identifier.
    fn id_type(&self, id: &str) -> IdType;

    /// Generate a fresh identifier of the given kind.
    fn next_id(&self, id_type: IdType, document_uri: &str) -> Result<String, Error>;

    /// Every object, optionally limited to one document and one type.
    fn all_items(
        &self,
        document_uri: Option<&str>,
        type_name: Option<&str>,
    ) -> Result<Vec<TypedValue>, Error>;

    /// Delete an object and all of its properties.
    fn delete(&self, document_uri: &str, id: &str) -> Result<(), Error>;

    /// Enter a critical section.
    ///
    /// Shared sections may overlap each other; an exclusive section excludes
    /// every other section. The section is left when the returned
    /// [`StoreLock`] is dropped.
    fn enter_critical_section(
        &self,
        document_uri: &str,
        exclusive: bool,
    ) -> Result<StoreLock<'_>, Error>;
}

/// Guard for a store critical section. Dropping it leaves the section.
pub struct StoreLock<'a> {
    _read: Option<RwLockReadGuard<'a, ()>>,
    _write: Option<RwLockWriteGuard<'a, ()>>,
}

impl<'a> StoreLock<'a> {
    /// Acquire `lock` for reading.
    pub fn shared(lock: &'a RwLock<()>) -> Result<Self, Error> {
        let guard = lock.read().map_err(|e| Error::Lock {
            message: e.to_string(),
        })?;
        Ok(Self {
            _read: Some(guard),
            _write: None,
        })
    }

    /// Acquire `lock` for writing.
    pub fn exclusive(lock: &'a RwLock<()>) -> Result<Self, Error> {
        let guard = lock.write().map_err(|e| Error::Lock {
            message: e.to_string(),
        })?;
        Ok(Self {
            _read: None,
            _write: Some(guard),
        })
    }

    pub fn is_exclusive(&self) -> bool {
        self._write.is_some()
    }
}

/// Property metadata taken from a JSON-LD style schema context.
pub trait SchemaContext: Send + Sync {
    /// Declared type of a property, with any vocabulary prefix removed.
    ///
    /// `None` when the property is unknown or declares no type.
    fn type_of(&self, property: &str) -> Option<String>;

    /// Check whether a property is declared multi-valued.
    fn is_multi_valued(&self, property: &str) -> bool;
}

/// Codec for converting between Value and bytes.
///
/// Codecs handle the parsing (decode) and serialization (encode) of
/// documents. The graph code never sees wire bytes - that's the codec's job.
pub trait Codec: Send + Sync {
    /// Decode raw bytes into a Value.
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error>;

    /// Encode a Value into raw bytes.
    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error>;

    /// Check if this codec supports a format.
    fn supports(&self, format: &Format) -> bool;
}

// Blanket implementations for references and boxes

impl<T: ModelStore + ?Sized> ModelStore for std::sync::Arc<T> {
    fn exists(&self, document_uri: &str, id: &str) -> Result<bool, Error> {
        self.as_ref().exists(document_uri, id)
    }

    fn create(&self, document_uri: &str, id: &str, type_name: &str) -> Result<(), Error> {
        self.as_ref().create(document_uri, id, type_name)
    }

    fn get_value(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<Option<StoredValue>, Error> {
        self.as_ref().get_value(document_uri, id, property)
    }

    fn set_value(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> Result<(), Error> {
        self.as_ref().set_value(document_uri, id, property, value)
    }

    fn add_value_to_collection(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> Result<bool, Error> {
        self.as_ref()
            .add_value_to_collection(document_uri, id, property, value)
    }

    fn clear_value_collection(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<(), Error> {
        self.as_ref()
            .clear_value_collection(document_uri, id, property)
    }

    fn list_values(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<Vec<StoredValue>, Error> {
        self.as_ref().list_values(document_uri, id, property)
    }

    fn is_collection_property(
        &self,
        document_uri: &str,
        id: &str,
        property: &str,
    ) -> Result<bool, Error> {
        self.as_ref()
            .is_collection_property(document_uri, id, property)
    }

    fn property_value_names(&self, document_uri: &str, id: &str) -> Result<Vec<String>, Error> {
        self.as_ref().property_value_names(document_uri, id)
    }

    fn id_type(&self, id: &str) -> IdType {
        self.as_ref().id_type(id)
    }

    fn next_id(&self, id_type: IdType, document_uri: &str) -> Result<String, Error> {
        self.as_ref().next_id(id_type, document_uri)
    }

    fn all_items(
        &self,
        document_uri: Option<&str>,
        type_name: Option<&str>,
    ) -> Result<Vec<TypedValue>, Error> {
        self.as_ref().all_items(document_uri, type_name)
    }

    fn delete(&self, document_uri: &str, id: &str) -> Result<(), Error> {
        self.as_ref().delete(document_uri, id)
    }

    fn enter_critical_section(
        &self,
        document_uri: &str,
        exclusive: bool,
    ) -> Result<StoreLock<'_>, Error> {
        self.as_ref().enter_critical_section(document_uri, exclusive)
    }
}

impl<T: Codec + ?Sized> Codec for Box<T> {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        self.as_ref().decode(bytes, format)
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        self.as_ref().encode(value, format)
    }

    fn supports(&self, format: &Format) -> bool {
        self.as_ref().supports(format)
    }
}
