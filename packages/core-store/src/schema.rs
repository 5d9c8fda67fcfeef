//! Schema context backed by the SPDX JSON-LD context document, and the
//! classification of declared types.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde_json::Value as JsonValue;

use crate::enums::is_enum_type;
use crate::traits::SchemaContext;
use crate::vocab::*;
use crate::Error;

const SPDX_2_3_CONTEXT: &str = include_str!("../resources/spdx-2.3-context.jsonld");

/// Primitive types that XML-schema datatypes collapse to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    String,
    Boolean,
    Integer,
}

lazy_static! {
    static ref XSD_PRIMITIVES: HashMap<&'static str, Primitive> = {
        let mut m = HashMap::new();
        for name in [
            "string",
            "anyURI",
            "dateTime",
            "date",
            "time",
            "hexBinary",
            "base64Binary",
            "normalizedString",
            "token",
            "language",
            "NMTOKEN",
            "Name",
            "NCName",
            "decimal",
            "float",
            "double",
        ] {
            m.insert(name, Primitive::String);
        }
        m.insert("boolean", Primitive::Boolean);
        for name in [
            "integer",
            "int",
            "long",
            "short",
            "byte",
            "positiveInteger",
            "nonNegativeInteger",
            "negativeInteger",
            "nonPositiveInteger",
            "unsignedLong",
            "unsignedInt",
            "unsignedShort",
            "unsignedByte",
        ] {
            m.insert(name, Primitive::Integer);
        }
        m
    };
}

/// Map an XML-schema datatype name to its primitive.
pub fn xsd_primitive(type_name: &str) -> Option<Primitive> {
    XSD_PRIMITIVES.get(type_name).copied()
}

const LICENSE_TYPES: &[&str] = &[
    CLASS_ANY_LICENSE_INFO,
    CLASS_SIMPLE_LICENSING_INFO,
    CLASS_LICENSE,
    CLASS_LISTED_LICENSE,
    CLASS_EXTRACTED_LICENSING_INFO,
    CLASS_CONJUNCTIVE_LICENSE_SET,
    CLASS_DISJUNCTIVE_LICENSE_SET,
    CLASS_OR_LATER_OPERATOR,
    CLASS_WITH_EXCEPTION_OPERATOR,
];

const ELEMENT_TYPES: &[&str] = &[
    CLASS_SPDX_ELEMENT,
    CLASS_SPDX_ITEM,
    CLASS_SPDX_PACKAGE,
    CLASS_SPDX_FILE,
    CLASS_SPDX_SNIPPET,
];

const MODEL_TYPES: &[&str] = &[
    CLASS_RELATIONSHIP,
    CLASS_ANNOTATION,
    CLASS_CHECKSUM,
    CLASS_CREATION_INFO,
    CLASS_EXTERNAL_REF,
    CLASS_EXTERNAL_DOC_REF,
    CLASS_PACKAGE_VERIFICATION_CODE,
    CLASS_CROSS_REF,
    CLASS_START_END_POINTER,
    CLASS_SINGLE_POINTER,
    CLASS_BYTE_OFFSET_POINTER,
    CLASS_LINE_CHAR_POINTER,
    CLASS_LISTED_LICENSE_EXCEPTION,
];

/// How a declared type is treated when converting values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeClass {
    /// Any license; stored as a parsed license expression.
    License,
    /// A whole SPDX document; referenced by namespace URI.
    Document,
    /// External reference type; referenced by URI.
    ReferenceType,
    /// An SPDX element; referenced by ID.
    Element,
    Enumeration,
    Primitive(Primitive),
    /// Any other model class; only representable as a nested object.
    Model,
}

impl TypeClass {
    /// Classify a declared type name. `None` for types outside the model.
    pub fn of(type_name: &str) -> Option<TypeClass> {
        if LICENSE_TYPES.contains(&type_name) {
            Some(TypeClass::License)
        } else if type_name == CLASS_SPDX_DOCUMENT {
            Some(TypeClass::Document)
        } else if type_name == CLASS_REFERENCE_TYPE {
            Some(TypeClass::ReferenceType)
        } else if ELEMENT_TYPES.contains(&type_name) {
            Some(TypeClass::Element)
        } else if is_enum_type(type_name) {
            Some(TypeClass::Enumeration)
        } else if let Some(primitive) = xsd_primitive(type_name) {
            Some(TypeClass::Primitive(primitive))
        } else if MODEL_TYPES.contains(&type_name) {
            Some(TypeClass::Model)
        } else {
            None
        }
    }
}

/// License types render as expressions unless fully expanded.
pub fn is_license_type(type_name: &str) -> bool {
    LICENSE_TYPES.contains(&type_name)
}

/// Elements carry an `SPDXID`. The document itself is an element.
pub fn is_element_type(type_name: &str) -> bool {
    type_name == CLASS_SPDX_DOCUMENT || ELEMENT_TYPES.contains(&type_name)
}

/// License types identified by `licenseId`.
pub fn is_simple_licensing_info(type_name: &str) -> bool {
    matches!(
        type_name,
        CLASS_SIMPLE_LICENSING_INFO
            | CLASS_LICENSE
            | CLASS_LISTED_LICENSE
            | CLASS_EXTRACTED_LICENSING_INFO
    )
}

#[derive(Clone, Debug, Default)]
struct PropertyDefinition {
    type_name: Option<String>,
    multi_valued: bool,
}

/// A [`SchemaContext`] read from a JSON-LD context document.
///
/// Each term of the `@context` object may declare an `@type` (for example
/// `xsd:string` or `spdx:Checksum`) and a `@container`. Terms whose container
/// is `@list`, `@set` or `@index` are multi-valued.
#[derive(Clone, Debug, Default)]
pub struct JsonLdContext {
    properties: HashMap<String, PropertyDefinition>,
}

impl JsonLdContext {
    /// The bundled SPDX 2.3 context.
    pub fn spdx_2_3() -> Result<Self, Error> {
        Self::from_json(SPDX_2_3_CONTEXT)
    }

    /// Parse a JSON-LD context document.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let root: JsonValue = serde_json::from_str(text).map_err(|e| Error::Other {
            message: format!("invalid JSON-LD context: {}", e),
        })?;
        let terms = root
            .get("@context")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::Other {
                message: "JSON-LD context has no @context object".to_string(),
            })?;

        let mut properties = HashMap::new();
        for (name, term) in terms {
            if let JsonValue::Object(term) = term {
                let definition = PropertyDefinition {
                    type_name: term.get("@type").and_then(declared_type),
                    multi_valued: term.get("@container").is_some_and(is_list_container),
                };
                properties.insert(name.clone(), definition);
            }
        }
        Ok(Self { properties })
    }
}

/// Strip the vocabulary prefix: `spdx:Checksum` -> `Checksum`.
fn strip_prefix(type_name: &str) -> String {
    match type_name.rfind(':') {
        Some(idx) => type_name[idx + 1..].to_string(),
        None => type_name.to_string(),
    }
}

fn declared_type(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.starts_with('@') => Some(strip_prefix(s)),
        JsonValue::Array(items) => items
            .iter()
            .filter_map(JsonValue::as_str)
            .find(|s| !s.starts_with('@'))
            .map(strip_prefix),
        _ => None,
    }
}

fn is_list_container(value: &JsonValue) -> bool {
    match value {
        JsonValue::String(s) => matches!(s.as_str(), "@list" | "@set" | "@index"),
        JsonValue::Array(items) => items.iter().any(is_list_container),
        _ => false,
    }
}

impl SchemaContext for JsonLdContext {
    fn type_of(&self, property: &str) -> Option<String> {
        self.properties
            .get(property)
            .and_then(|definition| definition.type_name.clone())
    }

    fn is_multi_valued(&self, property: &str) -> bool {
        self.properties
            .get(property)
            .is_some_and(|definition| definition.multi_valued)
    }
}
