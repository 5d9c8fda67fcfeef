//! Singular store property names <-> plural serialized field names.

use spdx_core_store::vocab::{PROP_DOCUMENT_DESCRIBES, PROP_LICENSE_INFO_FROM_FILES};

/// Fields whose serialized name is the store name.
const UNCHANGED: &[&str] = &[PROP_LICENSE_INFO_FROM_FILES, PROP_DOCUMENT_DESCRIBES];

/// `annotation` -> `annotations`, `seeAlso` -> `seeAlsos`, `entity` -> `entities`.
pub fn property_name_to_collection_name(property: &str) -> String {
    if UNCHANGED.contains(&property) {
        property.to_string()
    } else if let Some(stem) = property.strip_suffix('y') {
        format!("{}ies", stem)
    } else {
        format!("{}s", property)
    }
}

/// `annotations` -> `annotation`, `entities` -> `entity`.
///
/// Names without a plural ending are returned unchanged.
pub fn collection_name_to_property_name(field: &str) -> String {
    if UNCHANGED.contains(&field) {
        field.to_string()
    } else if let Some(stem) = field.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = field.strip_suffix('s') {
        stem.to_string()
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluralizes() {
        assert_eq!(property_name_to_collection_name("annotation"), "annotations");
        assert_eq!(property_name_to_collection_name("hasFile"), "hasFiles");
        assert_eq!(property_name_to_collection_name("seeAlso"), "seeAlsos");
        assert_eq!(property_name_to_collection_name("entity"), "entities");
        assert_eq!(
            property_name_to_collection_name("hasExtractedLicensingInfo"),
            "hasExtractedLicensingInfos"
        );
    }

    #[test]
    fn singularizes() {
        assert_eq!(collection_name_to_property_name("annotations"), "annotation");
        assert_eq!(collection_name_to_property_name("hasFiles"), "hasFile");
        assert_eq!(collection_name_to_property_name("entities"), "entity");
        assert_eq!(collection_name_to_property_name("creator"), "creator");
    }

    #[test]
    fn exceptions_are_unchanged_both_ways() {
        for name in ["licenseInfoFromFiles", "documentDescribes"] {
            assert_eq!(property_name_to_collection_name(name), name);
            assert_eq!(collection_name_to_property_name(name), name);
        }
    }

    #[test]
    fn collection_names_reverse() {
        for name in [
            "annotation",
            "checksum",
            "externalDocumentRef",
            "fileType",
            "licenseInfoInFile",
            "relationship",
            "range",
        ] {
            let plural = property_name_to_collection_name(name);
            assert_eq!(collection_name_to_property_name(&plural), name);
        }
    }
}
