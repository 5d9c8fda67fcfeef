//! Conversion of single tree nodes into store values and back.

use spdx_core_store::enums::{find_member, member_by_uri};
use spdx_core_store::schema::xsd_primitive;
use spdx_core_store::vocab::*;
use spdx_core_store::{Error, IdType, Map, ModelStore, Primitive, StoredValue, Value};

use crate::external::{is_external_element_uri, uri_to_external_id};

/// Fields that name a nested object, in the order they are tried.
const NESTED_ID_FIELDS: &[&str] = &[
    SPDX_IDENTIFIER,
    PROP_LICENSE_ID,
    PROP_LICENSE_EXCEPTION_ID,
    PROP_EXTERNAL_DOCUMENT_ID,
];

fn declared_primitive(declared: Option<&str>) -> Option<Option<Primitive>> {
    declared.map(xsd_primitive)
}

/// Store a boolean node.
///
/// String-typed properties get `"true"`/`"false"`. Properties declared with
/// a non-boolean type reject the value.
pub fn decode_boolean(value: bool, declared: Option<&str>) -> Result<StoredValue, Error> {
    match declared_primitive(declared) {
        None | Some(Some(Primitive::Boolean)) => Ok(StoredValue::Bool(value)),
        Some(Some(Primitive::String)) => Ok(StoredValue::String(value.to_string())),
        Some(_) => Err(Error::invalid_value(format!(
            "boolean {} does not fit declared type {}",
            value,
            declared.unwrap_or_default()
        ))),
    }
}

/// Store a numeric node.
///
/// String-typed properties get decimal text. Without a declared type an
/// integral number is stored natively and anything else as text.
pub fn decode_number(value: &Value, declared: Option<&str>) -> Result<StoredValue, Error> {
    let integral = match value {
        Value::Integer(i) => Some(*i),
        Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
        Value::Float(_) => None,
        other => {
            return Err(Error::invalid_type(format!(
                "expected a number, found {}",
                other.kind()
            )))
        }
    };
    let text = || value.as_text().unwrap_or_default();
    match (declared_primitive(declared), integral) {
        (Some(Some(Primitive::String)), _) => Ok(StoredValue::String(text())),
        (None, Some(i)) | (Some(Some(Primitive::Integer)), Some(i)) => Ok(StoredValue::Integer(i)),
        (None, None) => Ok(StoredValue::String(text())),
        _ => Err(Error::invalid_value(format!(
            "{} does not fit declared type {}",
            text(),
            declared.unwrap_or_default()
        ))),
    }
}

/// Convert text to a primitive of the declared kind.
pub fn decode_primitive_text(text: &str, primitive: Primitive) -> Result<StoredValue, Error> {
    match primitive {
        Primitive::String => Ok(StoredValue::String(text.to_string())),
        Primitive::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Ok(StoredValue::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(StoredValue::Bool(false))
            } else {
                Err(Error::invalid_value(format!("'{}' is not a boolean", text)))
            }
        }
        Primitive::Integer => text
            .trim()
            .parse::<i64>()
            .map(StoredValue::Integer)
            .map_err(|e| Error::invalid_value(format!("'{}' is not an integer: {}", text, e))),
    }
}

/// Enumeration text -> the member's URI.
pub fn decode_enum(type_name: &str, text: &str) -> Result<StoredValue, Error> {
    find_member(type_name, text)
        .map(|member| StoredValue::uri(member.uri.clone()))
        .ok_or_else(|| Error::UnknownEnumValue {
            type_name: type_name.to_string(),
            value: text.to_string(),
        })
}

/// Listed reference type names get the listed reference URI; anything else
/// is kept as a URI verbatim.
pub fn decode_reference_type(text: &str) -> StoredValue {
    if LISTED_REFERENCE_TYPES.contains(&text) {
        StoredValue::uri(format!("{}{}", LISTED_REFERENCE_TYPE_PREFIX, text))
    } else {
        StoredValue::uri(text)
    }
}

/// Concrete type of a `SinglePointer` node.
pub fn resolve_pointer_type(node: &Map) -> Result<&'static str, Error> {
    if node.contains_key(PROP_POINTER_OFFSET) {
        Ok(CLASS_BYTE_OFFSET_POINTER)
    } else if node.contains_key(PROP_POINTER_LINE_NUMBER) {
        Ok(CLASS_LINE_CHAR_POINTER)
    } else {
        Err(Error::TypeResolution {
            message: format!(
                "a {} needs an {} or a {} field",
                CLASS_SINGLE_POINTER, PROP_POINTER_OFFSET, PROP_POINTER_LINE_NUMBER
            ),
        })
    }
}

/// The identifying field of a nested object node, if it has one.
pub fn object_id_field(node: &Map) -> Option<(&'static str, &str)> {
    NESTED_ID_FIELDS.iter().find_map(|field| {
        node.get(*field)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(|id| (*field, id))
    })
}

/// Store ID for a nested object node: its identifying field, or a fresh
/// anonymous ID.
pub fn find_object_id(
    store: &dyn ModelStore,
    document_uri: &str,
    node: &Map,
) -> Result<String, Error> {
    match object_id_field(node) {
        Some((_, id)) => Ok(id.to_string()),
        None => store.next_id(IdType::Anonymous, document_uri),
    }
}

/// Text for an individual URI value.
///
/// Tried in order: enumeration members, external element URIs, the `NONE`
/// and `NOASSERTION` sentinels, listed reference types. Anything else is the
/// URI itself. An external element URI whose namespace no external document
/// reference names is an error.
pub fn individual_uri_to_text(
    store: &dyn ModelStore,
    document_uri: &str,
    uri: &str,
) -> Result<String, Error> {
    if let Some(member) = member_by_uri(uri) {
        return Ok(member.name.to_string());
    }
    if is_external_element_uri(uri) {
        return uri_to_external_id(store, document_uri, uri);
    }
    Ok(match uri {
        URI_VALUE_NONE => NONE_VALUE.to_string(),
        URI_VALUE_NOASSERTION => NOASSERTION_VALUE.to_string(),
        _ => uri
            .strip_prefix(LISTED_REFERENCE_TYPE_PREFIX)
            .unwrap_or(uri)
            .to_string(),
    })
}
