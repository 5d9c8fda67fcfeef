//! Tree flattening: store objects become a canonical document tree.

use std::collections::HashSet;

use spdx_core_store::schema::{is_element_type, is_license_type, is_simple_licensing_info};
use spdx_core_store::vocab::*;
use spdx_core_store::{Error, IdType, Map, ModelStore, StoredValue, TypedValue, Value, Verbose};

use crate::coercion::individual_uri_to_text;
use crate::comparator::sort_nodes;
use crate::deserializer::ELEMENT_COLLECTIONS;
use crate::license::render_license;
use crate::naming::property_name_to_collection_name;
use crate::property_order::compare_properties;

const DESCRIBES: &str = "DESCRIBES";
const CONTAINS: &str = "CONTAINS";

/// State shared by every object flattened for one document.
struct FlattenState {
    document_uri: String,
    relationships: Vec<Value>,
    /// (package ID, file ID) pairs already written as `hasFiles`.
    has_files_seen: HashSet<(String, String)>,
    /// Element IDs already written as `documentDescribes`.
    describes_seen: HashSet<String>,
    /// Objects currently being flattened.
    expanding: HashSet<String>,
}

impl FlattenState {
    fn new(document_uri: &str) -> Self {
        Self {
            document_uri: document_uri.to_string(),
            relationships: Vec::new(),
            has_files_seen: HashSet::new(),
            describes_seen: HashSet::new(),
            expanding: HashSet::new(),
        }
    }
}

/// `documentDescribes` and `hasFiles` entries of one object.
#[derive(Default)]
struct ConvenienceFields {
    describes: Vec<Value>,
    has_files: Vec<Value>,
}

impl ConvenienceFields {
    fn add_describes(&mut self, state: &mut FlattenState, related: String) {
        if state.describes_seen.insert(related.clone()) {
            self.describes.push(Value::String(related));
        }
    }

    fn add_has_file(&mut self, state: &mut FlattenState, owner: &str, related: String) {
        if state
            .has_files_seen
            .insert((owner.to_string(), related.clone()))
        {
            self.has_files.push(Value::String(related));
        }
    }

    fn write_into(self, node: &mut Map) {
        for (field, mut ids) in [
            (PROP_DOCUMENT_DESCRIBES.to_string(), self.describes),
            (property_name_to_collection_name(PROP_PACKAGE_FILE), self.has_files),
        ] {
            if !ids.is_empty() {
                sort_nodes(&mut ids);
                node.insert(field, Value::Array(ids));
            }
        }
    }
}

/// Keep the first relationship for each (subject, type, related element).
fn dedup_relationships(relationships: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    relationships
        .into_iter()
        .filter(|relationship| {
            let key = (
                relationship.get_str(PROP_ELEMENT_ID).map(str::to_string),
                relationship.get_str(PROP_RELATIONSHIP_TYPE).map(str::to_string),
                relationship.get_str(PROP_RELATED_ELEMENT).map(str::to_string),
            );
            seen.insert(key)
        })
        .collect()
}

/// Flattens SPDX documents held in a [`ModelStore`] into trees.
///
/// Output is deterministic: fields follow [`compare_properties`] and every
/// array is sorted with the canonical node order.
pub struct Serializer<'a> {
    store: &'a dyn ModelStore,
    verbose: Verbose,
}

impl<'a> Serializer<'a> {
    pub fn new(store: &'a dyn ModelStore, verbose: Verbose) -> Self {
        Self { store, verbose }
    }

    /// Flatten the document stored under `document_uri`.
    ///
    /// Holds a shared critical section for the whole call.
    pub fn document_to_tree(&self, document_uri: &str) -> Result<Value, Error> {
        let _lock = self.store.enter_critical_section(document_uri, false)?;
        self.document_to_tree_locked(document_uri)
    }

    fn document_to_tree_locked(&self, document_uri: &str) -> Result<Value, Error> {
        if !self.store.exists(document_uri, DOCUMENT_ID)? {
            return Err(Error::MissingDocument {
                message: format!("no {} in {}", DOCUMENT_ID, document_uri),
            });
        }
        log::debug!("Flattening document {}", document_uri);

        let mut state = FlattenState::new(document_uri);
        let document = TypedValue::new(DOCUMENT_ID, CLASS_SPDX_DOCUMENT, document_uri);
        let mut root = self
            .flatten_object(&mut state, &document)
            .map_err(|e| e.in_element(DOCUMENT_ID))?;
        root.insert(
            PROP_DOCUMENT_NAMESPACE.to_string(),
            Value::from(document_uri),
        );

        for &(field, type_name) in ELEMENT_COLLECTIONS {
            let mut elements = Vec::new();
            for element in self.store.all_items(Some(document_uri), Some(type_name))? {
                let node = self
                    .flatten_object(&mut state, &element)
                    .map_err(|e| e.in_element(element.id.as_str()))?;
                elements.push(Value::Map(node));
            }
            log::debug!("Flattened {} {} elements", elements.len(), type_name);
            if !elements.is_empty() {
                sort_nodes(&mut elements);
                root.insert(field.to_string(), Value::Array(elements));
            }
        }

        let mut relationships = dedup_relationships(std::mem::take(&mut state.relationships));
        if !relationships.is_empty() {
            sort_nodes(&mut relationships);
            root.insert(
                PROP_DOCUMENT_RELATIONSHIPS.to_string(),
                Value::Array(relationships),
            );
        }

        root.sort_by(|a, _, b, _| compare_properties(CLASS_SPDX_DOCUMENT, a, b));
        Ok(Value::Map(root))
    }

    fn flatten_object(&self, state: &mut FlattenState, object: &TypedValue) -> Result<Map, Error> {
        state.expanding.insert(object.id.clone());
        let result = self.flatten_properties(state, object);
        state.expanding.remove(&object.id);
        result
    }

    fn flatten_properties(
        &self,
        state: &mut FlattenState,
        object: &TypedValue,
    ) -> Result<Map, Error> {
        let document_uri = object.document_uri.as_str();
        let mut node = Map::new();
        if let Some((field, id)) = self.identifier_field(object)? {
            node.insert(field.to_string(), Value::String(id));
        }

        let mut convenience = ConvenienceFields::default();
        let mut properties = self.store.property_value_names(document_uri, &object.id)?;
        properties.sort_by(|a, b| compare_properties(&object.type_name, a, b));

        for property in &properties {
            if property == PROP_RELATIONSHIP {
                self.collect_relationships(state, object, &mut convenience)?;
                continue;
            }
            if !self
                .store
                .is_collection_property(document_uri, &object.id, property)?
            {
                if let Some(value) = self.store.get_value(document_uri, &object.id, property)? {
                    node.insert(property.clone(), self.to_serializable(state, &value)?);
                }
                continue;
            }

            let values = self.store.list_values(document_uri, &object.id, property)?;
            match property.as_str() {
                PROP_DOCUMENT_DESCRIBES => {
                    for value in &values {
                        let id = self.related_element_text(document_uri, value)?;
                        convenience.add_describes(state, id);
                    }
                }
                PROP_PACKAGE_FILE => {
                    for value in &values {
                        let id = self.related_element_text(document_uri, value)?;
                        convenience.add_has_file(state, &object.id, id);
                    }
                }
                _ => {
                    let mut items = Vec::with_capacity(values.len());
                    for value in &values {
                        items.push(match value {
                            StoredValue::Typed(tv) if property == PROP_EXTRACTED_LICENSE => {
                                Value::Map(self.flatten_object(state, tv)?)
                            }
                            other => self.to_serializable(state, other)?,
                        });
                    }
                    sort_nodes(&mut items);
                    node.insert(property_name_to_collection_name(property), Value::Array(items));
                }
            }
        }

        convenience.write_into(&mut node);
        node.sort_by(|a, _, b, _| compare_properties(&object.type_name, a, b));
        Ok(node)
    }

    /// The field naming an object, if its role has one.
    fn identifier_field(&self, object: &TypedValue) -> Result<Option<(&'static str, String)>, Error> {
        let id_type = self.store.id_type(&object.id);
        if id_type == IdType::Anonymous {
            return Ok(None);
        }
        let id = object.id.clone();
        if is_element_type(&object.type_name) {
            return match id_type {
                IdType::SpdxId => Ok(Some((SPDX_IDENTIFIER, id))),
                other => Err(Error::invalid_type(format!(
                    "element {} has a {:?} identifier",
                    object.id, other
                ))),
            };
        }
        Ok(match object.type_name.as_str() {
            CLASS_EXTERNAL_DOC_REF => Some((PROP_EXTERNAL_DOCUMENT_ID, id)),
            CLASS_LISTED_LICENSE_EXCEPTION => Some((PROP_LICENSE_EXCEPTION_ID, id)),
            type_name if is_simple_licensing_info(type_name) => Some((PROP_LICENSE_ID, id)),
            _ => None,
        })
    }

    /// Relationships of `subject` go to the shared relationship list, except
    /// plain `DESCRIBES` from the document and `CONTAINS` from a package to a
    /// file, which become convenience fields.
    fn collect_relationships(
        &self,
        state: &mut FlattenState,
        subject: &TypedValue,
        convenience: &mut ConvenienceFields,
    ) -> Result<(), Error> {
        let document_uri = subject.document_uri.as_str();
        for value in self
            .store
            .list_values(document_uri, &subject.id, PROP_RELATIONSHIP)?
        {
            let relationship = value.as_typed().ok_or_else(|| {
                Error::invalid_type(format!(
                    "relationship of {} is a {}",
                    subject.id,
                    value.kind()
                ))
            })?;
            let relationship_type =
                self.store
                    .get_value(document_uri, &relationship.id, PROP_RELATIONSHIP_TYPE)?;
            let related = self
                .store
                .get_value(document_uri, &relationship.id, PROP_RELATED_ELEMENT)?;
            let (Some(relationship_type), Some(related)) = (relationship_type, related) else {
                log::warn!(
                    "Skipping relationship {} of {}: missing related element or relationship type",
                    relationship.id,
                    subject.id
                );
                continue;
            };

            let type_name = match &relationship_type {
                StoredValue::Uri(uri) => individual_uri_to_text(self.store, document_uri, &uri.uri)?,
                other => {
                    return Err(Error::invalid_type(format!(
                        "relationship type of {} is a {}",
                        relationship.id,
                        other.kind()
                    )))
                }
            };
            let related_id = self.related_element_text(document_uri, &related)?;
            let comment = match self
                .store
                .get_value(document_uri, &relationship.id, PROP_COMMENT)?
            {
                Some(StoredValue::String(comment)) => Some(comment),
                Some(other) => {
                    return Err(Error::invalid_type(format!(
                        "comment of {} is a {}",
                        relationship.id,
                        other.kind()
                    )))
                }
                None => None,
            };

            if comment.is_none() {
                if type_name == DESCRIBES && subject.type_name == CLASS_SPDX_DOCUMENT {
                    convenience.add_describes(state, related_id);
                    continue;
                }
                let related_is_file = related
                    .as_typed()
                    .is_some_and(|tv| tv.type_name == CLASS_SPDX_FILE);
                if type_name == CONTAINS && subject.type_name == CLASS_SPDX_PACKAGE && related_is_file
                {
                    convenience.add_has_file(state, &subject.id, related_id);
                    continue;
                }
            }

            let mut node = Map::new();
            node.insert(PROP_ELEMENT_ID.to_string(), Value::from(subject.id.as_str()));
            node.insert(PROP_RELATIONSHIP_TYPE.to_string(), Value::String(type_name));
            node.insert(PROP_RELATED_ELEMENT.to_string(), Value::String(related_id));
            if let Some(comment) = comment {
                node.insert(PROP_COMMENT.to_string(), Value::String(comment));
            }
            state.relationships.push(Value::Map(node));
        }
        Ok(())
    }

    /// Text of a related element: its ID, a sentinel or an external ID.
    fn related_element_text(&self, document_uri: &str, value: &StoredValue) -> Result<String, Error> {
        match value {
            StoredValue::Typed(tv) => Ok(tv.id.clone()),
            StoredValue::Uri(uri) => individual_uri_to_text(self.store, document_uri, &uri.uri),
            StoredValue::String(text) => Ok(text.clone()),
            other => Err(Error::invalid_type(format!(
                "a related element cannot be a {}",
                other.kind()
            ))),
        }
    }

    fn to_serializable(&self, state: &mut FlattenState, value: &StoredValue) -> Result<Value, Error> {
        match value {
            StoredValue::Uri(uri) => Ok(Value::String(individual_uri_to_text(
                self.store,
                &state.document_uri,
                &uri.uri,
            )?)),
            StoredValue::String(text) => Ok(Value::from(text.as_str())),
            StoredValue::Bool(b) => Ok(Value::Bool(*b)),
            StoredValue::Integer(i) => Ok(Value::Integer(*i)),
            StoredValue::Typed(tv) => {
                if is_license_type(&tv.type_name) && self.verbose != Verbose::Full {
                    return Ok(Value::String(render_license(self.store, value)?));
                }
                let shallow = self.verbose == Verbose::Compact || state.expanding.contains(&tv.id);
                if shallow
                    && is_element_type(&tv.type_name)
                    && self.store.id_type(&tv.id) != IdType::Anonymous
                {
                    return Ok(Value::String(tv.id.clone()));
                }
                Ok(Value::Map(self.flatten_object(state, tv)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spdx_core_store::JsonLdContext;
    use spdx_mem_store::InMemoryStore;
    use spdx_serde_store::{json_to_value, value_to_json};

    use crate::Deserializer;

    const DOC: &str = "https://example.com/doc";

    fn load(tree: serde_json::Value) -> InMemoryStore {
        let store = InMemoryStore::new();
        let context = JsonLdContext::spdx_2_3().unwrap();
        Deserializer::new(&store, &context)
            .store_document(DOC, &json_to_value(tree))
            .unwrap();
        store
    }

    fn flatten(store: &InMemoryStore, verbose: Verbose) -> serde_json::Value {
        value_to_json(&Serializer::new(store, verbose).document_to_tree(DOC).unwrap())
    }

    #[test]
    fn describes_round_trips_as_convenience_field() {
        let store = load(json!({
            "SPDXID": "SPDXRef-DOCUMENT",
            "packages": [{"SPDXID": "SPDXRef-P"}],
            "documentDescribes": ["SPDXRef-P"]
        }));
        let tree = flatten(&store, Verbose::Compact);
        assert_eq!(tree["documentDescribes"], json!(["SPDXRef-P"]));
        assert!(tree.get("relationships").is_none());
        assert_eq!(tree["documentNamespace"], json!(DOC));
    }

    #[test]
    fn explicit_describes_is_folded_into_convenience_field() {
        let store = load(json!({
            "packages": [{"SPDXID": "SPDXRef-P"}],
            "relationships": [{
                "spdxElementId": "SPDXRef-DOCUMENT",
                "relationshipType": "DESCRIBES",
                "relatedSpdxElement": "SPDXRef-P"
            }]
        }));
        let tree = flatten(&store, Verbose::Compact);
        assert_eq!(tree["documentDescribes"], json!(["SPDXRef-P"]));
        assert!(tree.get("relationships").is_none());
    }

    #[test]
    fn commented_describes_stays_a_relationship() {
        let store = load(json!({
            "packages": [{"SPDXID": "SPDXRef-P"}],
            "relationships": [{
                "spdxElementId": "SPDXRef-DOCUMENT",
                "relationshipType": "DESCRIBES",
                "relatedSpdxElement": "SPDXRef-P",
                "comment": "main package"
            }]
        }));
        let tree = flatten(&store, Verbose::Compact);
        assert!(tree.get("documentDescribes").is_none());
        assert_eq!(tree["relationships"][0]["comment"], json!("main package"));
    }

    #[test]
    fn package_files_become_has_files() {
        let store = load(json!({
            "packages": [{"SPDXID": "SPDXRef-P", "hasFiles": ["SPDXRef-F2", "SPDXRef-F1"]}],
            "files": [{"SPDXID": "SPDXRef-F1"}, {"SPDXID": "SPDXRef-F2"}]
        }));
        let tree = flatten(&store, Verbose::Compact);
        assert_eq!(
            tree["packages"][0]["hasFiles"],
            json!(["SPDXRef-F1", "SPDXRef-F2"])
        );
        assert!(tree.get("relationships").is_none());
    }

    #[test]
    fn document_fields_follow_canonical_order() {
        let store = load(json!({
            "name": "doc",
            "spdxVersion": "SPDX-2.3",
            "dataLicense": "CC0-1.0",
            "SPDXID": "SPDXRef-DOCUMENT",
            "packages": [{"SPDXID": "SPDXRef-P", "name": "p", "versionInfo": "1"}],
            "creationInfo": {"created": "2024-01-01T00:00:00Z", "creators": ["Tool: x"]}
        }));
        let tree = flatten(&store, Verbose::Compact);
        let fields: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(
            fields,
            vec![
                "SPDXID",
                "documentNamespace",
                "spdxVersion",
                "creationInfo",
                "name",
                "dataLicense",
                "packages"
            ]
        );
        let package: Vec<&String> = tree["packages"][0].as_object().unwrap().keys().collect();
        assert_eq!(package, vec!["SPDXID", "name", "versionInfo"]);
    }

    #[test]
    fn values_are_rendered_as_text() {
        let store = load(json!({
            "packages": [{
                "SPDXID": "SPDXRef-P",
                "licenseConcluded": "(MIT OR ISC) AND Zlib",
                "checksums": [{"algorithm": "SHA256", "checksumValue": "ab"}],
                "externalRefs": [{"referenceCategory": "PACKAGE_MANAGER", "referenceType": "purl", "referenceLocator": "pkg:npm/p"}],
                "filesAnalyzed": false
            }]
        }));
        let tree = flatten(&store, Verbose::Compact);
        let package = &tree["packages"][0];
        assert_eq!(package["licenseConcluded"], json!("(MIT OR ISC) AND Zlib"));
        assert_eq!(
            package["checksums"],
            json!([{"algorithm": "SHA256", "checksumValue": "ab"}])
        );
        assert_eq!(
            package["externalRefs"],
            json!([{"referenceCategory": "PACKAGE-MANAGER", "referenceLocator": "pkg:npm/p", "referenceType": "purl"}])
        );
        assert_eq!(package["filesAnalyzed"], json!(false));
    }

    #[test]
    fn extracted_licenses_are_always_expanded() {
        let store = load(json!({
            "hasExtractedLicensingInfos": [{"licenseId": "LicenseRef-1", "extractedText": "text"}],
            "packages": [{"SPDXID": "SPDXRef-P", "licenseDeclared": "LicenseRef-1"}]
        }));
        let tree = flatten(&store, Verbose::Compact);
        assert_eq!(
            tree["hasExtractedLicensingInfos"],
            json!([{"extractedText": "text", "licenseId": "LicenseRef-1"}])
        );
        assert_eq!(tree["packages"][0]["licenseDeclared"], json!("LicenseRef-1"));
    }

    #[test]
    fn verbosity_controls_element_references() {
        let store = load(json!({
            "files": [{"SPDXID": "SPDXRef-F", "fileName": "./a.c"}],
            "snippets": [{"SPDXID": "SPDXRef-S", "snippetFromFile": "SPDXRef-F"}]
        }));
        let compact = flatten(&store, Verbose::Compact);
        assert_eq!(compact["snippets"][0]["snippetFromFile"], json!("SPDXRef-F"));

        let standard = flatten(&store, Verbose::Standard);
        assert_eq!(
            standard["snippets"][0]["snippetFromFile"],
            json!({"SPDXID": "SPDXRef-F", "fileName": "./a.c"})
        );
    }

    #[test]
    fn full_verbosity_expands_licenses() {
        let store = load(json!({"packages": [{"SPDXID": "SPDXRef-P", "licenseConcluded": "MIT"}]}));
        let tree = flatten(&store, Verbose::Full);
        assert_eq!(
            tree["packages"][0]["licenseConcluded"],
            json!({"licenseId": "MIT"})
        );
    }

    #[test]
    fn relationships_are_sorted_and_unique() {
        let store = load(json!({
            "packages": [{"SPDXID": "SPDXRef-B"}, {"SPDXID": "SPDXRef-A"}],
            "relationships": [
                {"spdxElementId": "SPDXRef-B", "relationshipType": "DEPENDS_ON", "relatedSpdxElement": "SPDXRef-A"},
                {"spdxElementId": "SPDXRef-A", "relationshipType": "DEPENDS_ON", "relatedSpdxElement": "NONE"},
                {"spdxElementId": "SPDXRef-B", "relationshipType": "DEPENDS_ON", "relatedSpdxElement": "SPDXRef-A"}
            ]
        }));
        let tree = flatten(&store, Verbose::Compact);
        assert_eq!(
            tree["relationships"],
            json!([
                {"spdxElementId": "SPDXRef-A", "relationshipType": "DEPENDS_ON", "relatedSpdxElement": "NONE"},
                {"spdxElementId": "SPDXRef-B", "relationshipType": "DEPENDS_ON", "relatedSpdxElement": "SPDXRef-A"}
            ])
        );
    }

    #[test]
    fn dangling_relationship_is_skipped() {
        let store = load(json!({"packages": [{"SPDXID": "SPDXRef-A"}]}));
        store.create(DOC, "__anon__rel", CLASS_RELATIONSHIP).unwrap();
        store
            .add_value_to_collection(
                DOC,
                "SPDXRef-A",
                PROP_RELATIONSHIP,
                StoredValue::Typed(TypedValue::new("__anon__rel", CLASS_RELATIONSHIP, DOC)),
            )
            .unwrap();
        let tree = flatten(&store, Verbose::Compact);
        assert!(tree.get("relationships").is_none());
    }

    #[test]
    fn unmatched_external_element_fails() {
        let store = load(json!({
            "packages": [{"SPDXID": "SPDXRef-A"}],
            "relationships": [
                {"spdxElementId": "SPDXRef-A", "relationshipType": "DEPENDS_ON", "relatedSpdxElement": "NONE"}
            ]
        }));
        let relationship = store
            .list_values(DOC, "SPDXRef-A", PROP_RELATIONSHIP)
            .unwrap()
            .into_iter()
            .find_map(|v| v.as_typed().cloned())
            .unwrap();
        store
            .set_value(
                DOC,
                &relationship.id,
                PROP_RELATED_ELEMENT,
                StoredValue::uri("https://example.com/unknown#SPDXRef-lib"),
            )
            .unwrap();

        let err = Serializer::new(&store, Verbose::Compact)
            .document_to_tree(DOC)
            .unwrap_err();
        assert!(matches!(err.root(), Error::MissingElement { .. }));
    }

    #[test]
    fn missing_document_fails() {
        let store = InMemoryStore::new();
        let err = Serializer::new(&store, Verbose::Compact)
            .document_to_tree(DOC)
            .unwrap_err();
        assert!(matches!(err, Error::MissingDocument { .. }));
    }

    #[test]
    fn flattening_is_deterministic() {
        let store = load(json!({
            "packages": [{"SPDXID": "SPDXRef-B", "attributionTexts": ["z", "a"]}, {"SPDXID": "SPDXRef-A"}],
            "relationships": [
                {"spdxElementId": "SPDXRef-B", "relationshipType": "OTHER", "relatedSpdxElement": "SPDXRef-A"}
            ]
        }));
        let first = flatten(&store, Verbose::Compact);
        let second = flatten(&store, Verbose::Compact);
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first["packages"][0]["SPDXID"], json!("SPDXRef-A"));
        assert_eq!(first["packages"][1]["attributionTexts"], json!(["a", "z"]));
    }
}
