//! Field order of flattened objects.

use std::cmp::Ordering;

use spdx_core_store::vocab::{CLASS_SPDX_DOCUMENT, SPDX_IDENTIFIER};

use crate::naming::property_name_to_collection_name;

/// Fields of an SPDX document, in the order they are written.
const DOCUMENT_PROPERTY_ORDER: &[&str] = &[
    "SPDXID",
    "documentNamespace",
    "spdxVersion",
    "creationInfo",
    "name",
    "dataLicense",
    "comment",
    "externalDocumentRefs",
    "documentDescribes",
    "packages",
    "files",
    "snippets",
    "hasExtractedLicensingInfos",
    "annotations",
    "relationships",
];

/// Unlisted fields sort after every listed one.
const UNLISTED: usize = 999;

fn document_position(name: &str) -> usize {
    DOCUMENT_PROPERTY_ORDER
        .iter()
        .position(|listed| *listed == name)
        .or_else(|| {
            let plural = property_name_to_collection_name(name);
            DOCUMENT_PROPERTY_ORDER
                .iter()
                .position(|listed| *listed == plural)
        })
        .unwrap_or(UNLISTED)
}

/// Compare two property or field names of an object of type `type_name`.
///
/// Documents follow a fixed order with ties broken by name. Every other
/// type puts `SPDXID` first and orders the rest by name. Store property
/// names sort like their serialized plural.
pub fn compare_properties(type_name: &str, a: &str, b: &str) -> Ordering {
    if type_name == CLASS_SPDX_DOCUMENT {
        return document_position(a)
            .cmp(&document_position(b))
            .then_with(|| a.cmp(b));
    }
    match (a == SPDX_IDENTIFIER, b == SPDX_IDENTIFIER) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cmp(b),
    }
}
