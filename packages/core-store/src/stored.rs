//! Values as they live inside a [`ModelStore`](crate::ModelStore).

use std::fmt;

use crate::vocab::ANON_PREFIX;

/// Reference to an object held in the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypedValue {
    pub id: String,
    pub type_name: String,
    pub document_uri: String,
}

impl TypedValue {
    pub fn new(
        id: impl Into<String>,
        type_name: impl Into<String>,
        document_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            document_uri: document_uri.into(),
        }
    }

    /// Full URI of the object: `<document namespace>#<id>`.
    pub fn object_uri(&self) -> String {
        format!("{}#{}", self.document_uri, self.id)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.type_name)
    }
}

/// A value identified only by URI: enumeration members, sentinel license
/// values, reference types and elements of external documents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndividualUriValue {
    pub uri: String,
}

impl IndividualUriValue {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Everything a store property can hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StoredValue {
    Typed(TypedValue),
    Uri(IndividualUriValue),
    String(String),
    Bool(bool),
    Integer(i64),
}

impl StoredValue {
    pub fn uri(uri: impl Into<String>) -> Self {
        StoredValue::Uri(IndividualUriValue::new(uri))
    }

    pub fn as_typed(&self) -> Option<&TypedValue> {
        match self {
            StoredValue::Typed(tv) => Some(tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::Typed(_) => "typed value",
            StoredValue::Uri(_) => "individual URI",
            StoredValue::String(_) => "string",
            StoredValue::Bool(_) => "boolean",
            StoredValue::Integer(_) => "integer",
        }
    }
}

impl From<TypedValue> for StoredValue {
    fn from(v: TypedValue) -> Self {
        StoredValue::Typed(v)
    }
}

impl From<IndividualUriValue> for StoredValue {
    fn from(v: IndividualUriValue) -> Self {
        StoredValue::Uri(v)
    }
}

impl From<&str> for StoredValue {
    fn from(v: &str) -> Self {
        StoredValue::String(v.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(v: String) -> Self {
        StoredValue::String(v)
    }
}

impl From<bool> for StoredValue {
    fn from(v: bool) -> Self {
        StoredValue::Bool(v)
    }
}

impl From<i64> for StoredValue {
    fn from(v: i64) -> Self {
        StoredValue::Integer(v)
    }
}

/// Classification of an object identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdType {
    /// `SPDXRef-...`
    SpdxId,
    /// `LicenseRef-...`
    LicenseRef,
    /// `DocumentRef-...`
    DocumentRef,
    /// An SPDX listed license or exception identifier.
    ListedLicense,
    /// Generated, never serialized.
    Anonymous,
    Unknown,
}

impl IdType {
    /// Stable identifiers survive serialization and can be referenced by ID.
    pub fn is_stable(&self) -> bool {
        !matches!(self, IdType::Anonymous | IdType::Unknown)
    }
}

/// Check whether an identifier was generated for an anonymous object.
pub fn is_anonymous_id(id: &str) -> bool {
    id.starts_with(ANON_PREFIX)
}
