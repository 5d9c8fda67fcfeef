//! Graph reconstruction: a decoded document tree becomes store objects.
//!
//! Restoration is a single pass over the tree followed by a fixup pass.
//! Element references are stored as plain ID text first and recorded as
//! pending; once every element of the document exists they are replaced by
//! typed values, sentinel URIs or external element URIs.

use std::collections::{HashMap, HashSet};
use std::slice;

use spdx_core_store::enums::relationship_type_uri;
use spdx_core_store::vocab::*;
use spdx_core_store::{
    Error, IdType, Map, ModelStore, SchemaContext, StoredValue, TypeClass, TypedValue, Value,
};

use crate::coercion::{
    decode_boolean, decode_enum, decode_number, decode_primitive_text, decode_reference_type,
    find_object_id, object_id_field, resolve_pointer_type,
};
use crate::external::external_id_to_uri;
use crate::license::store_license_expression;
use crate::naming::collection_name_to_property_name;

/// Document fields restored structurally instead of as properties.
const DOCUMENT_SKIPPED_FIELDS: &[&str] = &[
    PROP_DOCUMENT_PACKAGES,
    PROP_DOCUMENT_FILES,
    PROP_DOCUMENT_SNIPPETS,
    SPDX_IDENTIFIER,
    PROP_DOCUMENT_RELATIONSHIPS,
    PROP_DOCUMENT_NAMESPACE,
];

/// Element collections of a document, in restore order.
pub(crate) const ELEMENT_COLLECTIONS: &[(&str, &str)] = &[
    (PROP_DOCUMENT_PACKAGES, CLASS_SPDX_PACKAGE),
    (PROP_DOCUMENT_FILES, CLASS_SPDX_FILE),
    (PROP_DOCUMENT_SNIPPETS, CLASS_SPDX_SNIPPET),
];

const DESCRIBES: &str = "DESCRIBES";
const CONTAINS: &str = "CONTAINS";

/// (subject ID, relationship type URI, related element text)
type RelationshipKey = (String, String, String);

/// Bookkeeping for one document being restored.
struct RestoreState {
    document_uri: String,
    /// Elements restored so far, by ID.
    added: HashMap<String, TypedValue>,
    /// Relationships created so far, for duplicate detection.
    relationships: HashMap<RelationshipKey, String>,
    /// (object ID, property) pairs still holding element ID text.
    pending: Vec<(String, String)>,
    pending_seen: HashSet<(String, String)>,
}

impl RestoreState {
    fn new(document_uri: &str) -> Self {
        Self {
            document_uri: document_uri.to_string(),
            added: HashMap::new(),
            relationships: HashMap::new(),
            pending: Vec::new(),
            pending_seen: HashSet::new(),
        }
    }

    fn add_pending(&mut self, id: &str, property: &str) {
        let key = (id.to_string(), property.to_string());
        if self.pending_seen.insert(key.clone()) {
            self.pending.push(key);
        }
    }
}

/// A single node, or every member of an array node. Null is empty.
///
/// XML cannot tell a one-element list from a single value, so every list
/// field accepts both shapes.
fn nodes(value: &Value) -> &[Value] {
    match value {
        Value::Null => &[],
        Value::Array(items) => items,
        single => slice::from_ref(single),
    }
}

fn required_text<'v>(node: &'v Map, field: &str, what: &str) -> Result<&'v str, Error> {
    node.get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::missing_field(format!("{} without {}", what, field)))
}

/// Restores SPDX documents into a [`ModelStore`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use spdx_core_store::{JsonLdContext, ModelStore};
/// use spdx_mem_store::InMemoryStore;
/// use spdx_multiformat_store::Deserializer;
/// use spdx_serde_store::json_to_value;
///
/// let store = InMemoryStore::new();
/// let context = JsonLdContext::spdx_2_3().unwrap();
/// let tree = json_to_value(json!({
///     "SPDXID": "SPDXRef-DOCUMENT",
///     "name": "example",
///     "packages": [{"SPDXID": "SPDXRef-zlib", "name": "zlib"}],
///     "documentDescribes": ["SPDXRef-zlib"]
/// }));
///
/// Deserializer::new(&store, &context)
///     .store_document("https://example.com/doc", &tree)
///     .unwrap();
/// assert!(store.exists("https://example.com/doc", "SPDXRef-zlib").unwrap());
/// ```
pub struct Deserializer<'a> {
    store: &'a dyn ModelStore,
    schema: &'a dyn SchemaContext,
}

impl<'a> Deserializer<'a> {
    pub fn new(store: &'a dyn ModelStore, schema: &'a dyn SchemaContext) -> Self {
        Self { store, schema }
    }

    /// Restore one document tree under `document_uri`.
    ///
    /// Holds the store's exclusive critical section for the whole call. On
    /// error, objects created so far stay in the store.
    pub fn store_document(&self, document_uri: &str, tree: &Value) -> Result<(), Error> {
        let _lock = self.store.enter_critical_section(document_uri, true)?;
        self.store_document_locked(document_uri, tree)
    }

    /// Like [`store_document`](Self::store_document), for callers already
    /// inside an exclusive critical section.
    pub(crate) fn store_document_locked(&self, document_uri: &str, tree: &Value) -> Result<(), Error> {
        let root = tree.as_map().ok_or_else(|| {
            Error::invalid_type(format!("a document must be an object, found {}", tree.kind()))
        })?;
        log::debug!("Restoring document {}", document_uri);

        let mut state = RestoreState::new(document_uri);
        self.store
            .create(document_uri, DOCUMENT_ID, CLASS_SPDX_DOCUMENT)?;
        let document = TypedValue::new(DOCUMENT_ID, CLASS_SPDX_DOCUMENT, document_uri);
        self.restore_properties(&mut state, &document, root, DOCUMENT_SKIPPED_FIELDS)
            .map_err(|e| e.in_element(DOCUMENT_ID))?;
        state.added.insert(DOCUMENT_ID.to_string(), document);

        for &(field, type_name) in ELEMENT_COLLECTIONS {
            if let Some(elements) = root.get(field) {
                self.restore_elements(&mut state, elements, type_name)?;
            }
        }
        if let Some(relationships) = root.get(PROP_DOCUMENT_RELATIONSHIPS) {
            for relationship in nodes(relationships) {
                self.restore_relationship(&mut state, relationship)?;
            }
        }

        self.fix_element_references(&state)?;
        log::debug!(
            "Restored {} elements and {} relationships into {}",
            state.added.len(),
            state.relationships.len(),
            document_uri
        );
        Ok(())
    }

    fn restore_elements(
        &self,
        state: &mut RestoreState,
        elements: &Value,
        type_name: &str,
    ) -> Result<(), Error> {
        for element in nodes(elements) {
            let node = element.as_map().ok_or_else(|| {
                Error::invalid_type(format!(
                    "a {} must be an object, found {}",
                    type_name,
                    element.kind()
                ))
            })?;
            let id = required_text(node, SPDX_IDENTIFIER, type_name)?;
            if state.added.contains_key(id) {
                return Err(Error::DuplicateIdentifier { id: id.to_string() });
            }

            let typed = TypedValue::new(id, type_name, state.document_uri.as_str());
            self.store
                .create(&state.document_uri, id, type_name)
                .and_then(|()| self.restore_properties(state, &typed, node, &[SPDX_IDENTIFIER]))
                .map_err(|e| e.in_element(id))?;
            state.added.insert(id.to_string(), typed);
        }
        Ok(())
    }

    fn restore_properties(
        &self,
        state: &mut RestoreState,
        owner: &TypedValue,
        node: &Map,
        skipped: &[&str],
    ) -> Result<(), Error> {
        for (field, value) in node {
            if skipped.contains(&field.as_str()) {
                continue;
            }
            if field == PROP_DOCUMENT_DESCRIBES {
                self.add_convenience_relationships(state, owner, field, value, DESCRIBES)?;
            } else if collection_name_to_property_name(field) == PROP_PACKAGE_FILE {
                self.add_convenience_relationships(state, owner, field, value, CONTAINS)?;
            } else {
                self.set_property_value(state, owner, field, value, false)?;
            }
        }
        Ok(())
    }

    /// `documentDescribes` and `hasFiles` entries become relationships from
    /// `owner` to each listed element.
    fn add_convenience_relationships(
        &self,
        state: &mut RestoreState,
        owner: &TypedValue,
        field: &str,
        value: &Value,
        relationship_type: &str,
    ) -> Result<(), Error> {
        let type_uri = relationship_type_uri(relationship_type).ok_or_else(|| {
            Error::UnknownEnumValue {
                type_name: ENUM_RELATIONSHIP_TYPE.to_string(),
                value: relationship_type.to_string(),
            }
        })?;
        for target in nodes(value) {
            let related = target.as_str().ok_or_else(|| {
                Error::invalid_type(format!(
                    "{} must list element IDs, found {}",
                    field,
                    target.kind()
                ))
            })?;
            let id = self.add_relationship(state, &owner.id, type_uri, related, None)?;
            state.add_pending(&id, PROP_RELATED_ELEMENT);
        }
        Ok(())
    }

    fn set_property_value(
        &self,
        state: &mut RestoreState,
        owner: &TypedValue,
        field: &str,
        value: &Value,
        list: bool,
    ) -> Result<(), Error> {
        let list = list || self.schema.is_multi_valued(field);
        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                for item in items {
                    self.set_property_value(state, owner, field, item, true)?;
                }
                Ok(())
            }
            _ => {
                let property = if list {
                    collection_name_to_property_name(field)
                } else {
                    field.to_string()
                };
                let stored = self.to_stored_value(state, owner, field, &property, value)?;
                if list {
                    self.store
                        .add_value_to_collection(&owner.document_uri, &owner.id, &property, stored)?;
                } else {
                    self.store
                        .set_value(&owner.document_uri, &owner.id, &property, stored)?;
                }
                Ok(())
            }
        }
    }

    fn to_stored_value(
        &self,
        state: &mut RestoreState,
        owner: &TypedValue,
        field: &str,
        property: &str,
        value: &Value,
    ) -> Result<StoredValue, Error> {
        let declared = self.schema.type_of(field);
        match value {
            Value::Bool(b) => decode_boolean(*b, declared.as_deref()),
            Value::Integer(_) | Value::Float(_) => decode_number(value, declared.as_deref()),
            Value::String(text) => {
                self.text_to_stored_value(state, owner, property, text, declared.as_deref())
            }
            Value::Map(node) => self.object_to_stored_value(state, field, node, declared.as_deref()),
            Value::Null | Value::Array(_) => Err(Error::invalid_type(format!(
                "{} cannot hold a nested {}",
                field,
                value.kind()
            ))),
        }
    }

    fn text_to_stored_value(
        &self,
        state: &mut RestoreState,
        owner: &TypedValue,
        property: &str,
        text: &str,
        declared: Option<&str>,
    ) -> Result<StoredValue, Error> {
        let Some(type_name) = declared else {
            return Ok(StoredValue::from(text));
        };
        match TypeClass::of(type_name) {
            Some(TypeClass::License) => {
                store_license_expression(self.store, &state.document_uri, text)
            }
            Some(TypeClass::Document) => Ok(StoredValue::uri(text)),
            Some(TypeClass::ReferenceType) => Ok(decode_reference_type(text)),
            Some(TypeClass::Element) => {
                state.add_pending(&owner.id, property);
                Ok(StoredValue::from(text))
            }
            Some(TypeClass::Enumeration) => decode_enum(type_name, text),
            Some(TypeClass::Primitive(primitive)) => decode_primitive_text(text, primitive),
            // XML writes an object without fields as an empty element.
            Some(TypeClass::Model) if text.is_empty() => {
                self.object_to_stored_value(state, property, &Map::new(), Some(type_name))
            }
            Some(TypeClass::Model) => Err(Error::TypeResolution {
                message: format!("{} expects a {} object, found text", property, type_name),
            }),
            None => Ok(StoredValue::from(text)),
        }
    }

    fn object_to_stored_value(
        &self,
        state: &mut RestoreState,
        field: &str,
        node: &Map,
        declared: Option<&str>,
    ) -> Result<StoredValue, Error> {
        let declared = declared.ok_or_else(|| Error::TypeResolution {
            message: format!("no type is declared for {}", field),
        })?;
        let type_name = if declared == CLASS_SINGLE_POINTER {
            resolve_pointer_type(node)?
        } else {
            declared
        };

        let id = find_object_id(self.store, &state.document_uri, node)?;
        let id_field = object_id_field(node).map(|(field, _)| field);
        self.store.create(&state.document_uri, &id, type_name)?;
        let nested = TypedValue::new(id, type_name, state.document_uri.as_str());
        self.restore_properties(state, &nested, node, id_field.as_slice())?;
        Ok(StoredValue::Typed(nested))
    }

    fn restore_relationship(&self, state: &mut RestoreState, node: &Value) -> Result<(), Error> {
        let node = node.as_map().ok_or_else(|| {
            Error::invalid_type(format!(
                "a relationship must be an object, found {}",
                node.kind()
            ))
        })?;

        let subject = required_text(node, PROP_ELEMENT_ID, "relationship")?;
        if !state.added.contains_key(subject) {
            return Err(Error::missing_element(format!(
                "relationship subject {} is not an element of {}",
                subject, state.document_uri
            )));
        }
        let type_text = required_text(node, PROP_RELATIONSHIP_TYPE, "relationship")?;
        let type_uri =
            relationship_type_uri(type_text).ok_or_else(|| Error::UnknownEnumValue {
                type_name: ENUM_RELATIONSHIP_TYPE.to_string(),
                value: type_text.to_string(),
            })?;
        let related = required_text(node, PROP_RELATED_ELEMENT, "relationship")?;
        let comment = node.get(PROP_COMMENT).and_then(Value::as_str);

        let id = self
            .add_relationship(state, subject, type_uri, related, comment)
            .map_err(|e| e.in_element(subject))?;
        state.add_pending(&id, PROP_RELATED_ELEMENT);
        Ok(())
    }

    /// Create a relationship from `subject`, or return the ID of an equal one
    /// created earlier. The related element is stored as text.
    fn add_relationship(
        &self,
        state: &mut RestoreState,
        subject: &str,
        type_uri: &str,
        related: &str,
        comment: Option<&str>,
    ) -> Result<String, Error> {
        let document_uri = state.document_uri.as_str();
        let key = (subject.to_string(), type_uri.to_string(), related.to_string());
        if let Some(existing) = state.relationships.get(&key) {
            log::debug!(
                "Collapsing duplicate relationship {} -> {} of {}",
                subject,
                related,
                document_uri
            );
            if let Some(comment) = comment {
                if self.store.get_value(document_uri, existing, PROP_COMMENT)?.is_none() {
                    self.store
                        .set_value(document_uri, existing, PROP_COMMENT, StoredValue::from(comment))?;
                }
            }
            return Ok(existing.clone());
        }

        let id = self.store.next_id(IdType::Anonymous, document_uri)?;
        self.store.create(document_uri, &id, CLASS_RELATIONSHIP)?;
        self.store.set_value(
            document_uri,
            &id,
            PROP_RELATIONSHIP_TYPE,
            StoredValue::uri(type_uri),
        )?;
        self.store
            .set_value(document_uri, &id, PROP_RELATED_ELEMENT, StoredValue::from(related))?;
        if let Some(comment) = comment {
            self.store
                .set_value(document_uri, &id, PROP_COMMENT, StoredValue::from(comment))?;
        }
        self.store.add_value_to_collection(
            document_uri,
            subject,
            PROP_RELATIONSHIP,
            StoredValue::Typed(TypedValue::new(id.as_str(), CLASS_RELATIONSHIP, document_uri)),
        )?;
        state.relationships.insert(key, id.clone());
        Ok(id)
    }

    /// Replace pending element ID text with resolved values.
    fn fix_element_references(&self, state: &RestoreState) -> Result<(), Error> {
        let document_uri = state.document_uri.as_str();
        for (id, property) in &state.pending {
            if self.store.is_collection_property(document_uri, id, property)? {
                let resolved = self
                    .store
                    .list_values(document_uri, id, property)?
                    .iter()
                    .map(|value| self.resolve_reference(state, value))
                    .collect::<Result<Vec<_>, _>>()?;
                self.store.clear_value_collection(document_uri, id, property)?;
                for value in resolved {
                    self.store
                        .add_value_to_collection(document_uri, id, property, value)?;
                }
            } else {
                let value = self
                    .store
                    .get_value(document_uri, id, property)?
                    .ok_or_else(|| {
                        Error::missing_element(format!("{} of {} is not set", property, id))
                    })?;
                let resolved = self.resolve_reference(state, &value)?;
                self.store.set_value(document_uri, id, property, resolved)?;
            }
        }
        Ok(())
    }

    fn resolve_reference(&self, state: &RestoreState, value: &StoredValue) -> Result<StoredValue, Error> {
        match value {
            StoredValue::String(text) => self.id_to_object_value(state, text),
            StoredValue::Typed(_) | StoredValue::Uri(_) => Ok(value.clone()),
            other => Err(Error::invalid_type(format!(
                "an element reference cannot be a {}",
                other.kind()
            ))),
        }
    }

    /// Element ID text -> element, sentinel or external element URI.
    fn id_to_object_value(&self, state: &RestoreState, text: &str) -> Result<StoredValue, Error> {
        if let Some(element) = state.added.get(text) {
            return Ok(StoredValue::Typed(element.clone()));
        }
        match text {
            NONE_VALUE => Ok(StoredValue::uri(URI_VALUE_NONE)),
            NOASSERTION_VALUE => Ok(StoredValue::uri(URI_VALUE_NOASSERTION)),
            _ if text.starts_with(DOCUMENT_REF_PREFIX) => {
                external_id_to_uri(self.store, &state.document_uri, text).map(StoredValue::uri)
            }
            _ => Err(Error::missing_element(format!(
                "{} is not an element of {}",
                text, state.document_uri
            ))),
        }
    }
}
