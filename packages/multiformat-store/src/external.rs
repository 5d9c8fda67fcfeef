//! References to elements of other SPDX documents.
//!
//! Inside a document an external element is written `DocumentRef-X:SPDXRef-Y`,
//! where `DocumentRef-X` is an external document reference of the current
//! document. In the store it is kept as the URI `<namespace of X>#SPDXRef-Y`.

use lazy_static::lazy_static;
use regex::Regex;

use spdx_core_store::vocab::{CLASS_EXTERNAL_DOC_REF, PROP_EXTERNAL_SPDX_DOCUMENT};
use spdx_core_store::{Error, ModelStore, StoredValue};

lazy_static! {
    static ref EXTERNAL_ELEMENT_ID: Regex =
        Regex::new(r"^(DocumentRef-[A-Za-z0-9.\-+]+):(SPDXRef-[A-Za-z0-9.\-+]+)$").unwrap();
    static ref EXTERNAL_ELEMENT_URI: Regex =
        Regex::new(r"^(.+)#(SPDXRef-[A-Za-z0-9.\-+]+)$").unwrap();
}

/// Check whether a URI has the shape of an external element URI.
pub fn is_external_element_uri(uri: &str) -> bool {
    EXTERNAL_ELEMENT_URI.is_match(uri)
}

fn referenced_namespace(
    store: &dyn ModelStore,
    document_uri: &str,
    document_ref: &str,
) -> Result<Option<String>, Error> {
    if !store.exists(document_uri, document_ref)? {
        return Ok(None);
    }
    Ok(
        match store.get_value(document_uri, document_ref, PROP_EXTERNAL_SPDX_DOCUMENT)? {
            Some(StoredValue::Uri(uri)) => Some(uri.uri),
            Some(StoredValue::String(s)) => Some(s),
            Some(StoredValue::Typed(tv)) => Some(tv.document_uri),
            _ => None,
        },
    )
}

/// `DocumentRef-X:SPDXRef-Y` -> `<namespace of X>#SPDXRef-Y`.
pub fn external_id_to_uri(
    store: &dyn ModelStore,
    document_uri: &str,
    external_id: &str,
) -> Result<String, Error> {
    let captures = EXTERNAL_ELEMENT_ID.captures(external_id).ok_or_else(|| {
        Error::missing_element(format!(
            "{} is not a valid external element reference",
            external_id
        ))
    })?;
    let document_ref = &captures[1];
    let namespace = referenced_namespace(store, document_uri, document_ref)?.ok_or_else(|| {
        Error::missing_element(format!(
            "no external document reference {} in {}",
            document_ref, document_uri
        ))
    })?;
    Ok(format!("{}#{}", namespace, &captures[2]))
}

/// `<namespace>#SPDXRef-Y` -> `DocumentRef-X:SPDXRef-Y`, where `DocumentRef-X`
/// is the external document reference of `document_uri` naming `namespace`.
pub fn uri_to_external_id(
    store: &dyn ModelStore,
    document_uri: &str,
    uri: &str,
) -> Result<String, Error> {
    let captures = EXTERNAL_ELEMENT_URI.captures(uri).ok_or_else(|| {
        Error::invalid_value(format!("{} is not an external element URI", uri))
    })?;
    let namespace = &captures[1];
    for doc_ref in store.all_items(Some(document_uri), Some(CLASS_EXTERNAL_DOC_REF))? {
        if referenced_namespace(store, document_uri, &doc_ref.id)?.as_deref() == Some(namespace) {
            return Ok(format!("{}:{}", doc_ref.id, &captures[2]));
        }
    }
    Err(Error::missing_element(format!(
        "no external document reference in {} for namespace {}",
        document_uri, namespace
    )))
}
