//! Error types shared by every SPDX store crate.

use crate::format::{Format, Verbose};

/// Errors raised while reconstructing, flattening or storing SPDX documents.
///
/// Failures inside one element are wrapped in [`Error::Element`] so the
/// caller can see which element was being restored; [`Error::root`] strips
/// that context again.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A field that must be present is missing or empty.
    #[error("missing required field: {message}")]
    MissingRequiredField { message: String },

    /// The same element identifier appears twice in one document.
    #[error("duplicate identifier: {id}")]
    DuplicateIdentifier { id: String },

    /// Text does not name a member of an enumeration.
    #[error("unknown value '{value}' for enumeration {type_name}")]
    UnknownEnumValue { type_name: String, value: String },

    /// No type could be determined for a property value.
    #[error("type resolution failed: {message}")]
    TypeResolution { message: String },

    /// A value could not be converted to its declared type.
    #[error("invalid value: {message}")]
    InvalidValue { message: String },

    /// A stored or decoded value has the wrong shape.
    #[error("invalid type: {message}")]
    InvalidType { message: String },

    /// A referenced element or object does not exist.
    #[error("missing element: {message}")]
    MissingElement { message: String },

    /// The document namespace is already loaded and overwrite was not requested.
    #[error("document namespace already exists: {namespace}")]
    AlreadyExists { namespace: String },

    /// No document, or no document namespace, was found.
    #[error("missing document: {message}")]
    MissingDocument { message: String },

    /// Only compact documents can be read back.
    #[error("unsupported verbosity for deserialization: {verbose}")]
    UnsupportedVerbosity { verbose: Verbose },

    /// Codec failed to decode bytes.
    #[error("decode error ({format}): {message}")]
    Decode { format: Format, message: String },

    /// Codec failed to encode a value.
    #[error("encode error ({format}): {message}")]
    Encode { format: Format, message: String },

    /// Format not supported by codec.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(Format),

    /// A store lock was poisoned by a panicking holder.
    #[error("lock error: {message}")]
    Lock { message: String },

    /// Failure while restoring or flattening a specific element.
    #[error("error in element {id}: {source}")]
    Element {
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// Generic error with message.
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn decode(format: Format, message: impl Into<String>) -> Self {
        Error::Decode {
            format,
            message: message.into(),
        }
    }

    pub fn encode(format: Format, message: impl Into<String>) -> Self {
        Error::Encode {
            format,
            message: message.into(),
        }
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Error::InvalidValue {
            message: message.into(),
        }
    }

    pub fn invalid_type(message: impl Into<String>) -> Self {
        Error::InvalidType {
            message: message.into(),
        }
    }

    pub fn missing_element(message: impl Into<String>) -> Self {
        Error::MissingElement {
            message: message.into(),
        }
    }

    pub fn missing_field(message: impl Into<String>) -> Self {
        Error::MissingRequiredField {
            message: message.into(),
        }
    }

    /// Wrap this error with the ID of the element being processed.
    ///
    /// Errors that already carry an element are left alone so the innermost
    /// element stays visible.
    pub fn in_element(self, id: impl Into<String>) -> Self {
        match self {
            Error::Element { .. } => self,
            other => Error::Element {
                id: id.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error with any element context removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Element { source, .. } => source.root(),
            other => other,
        }
    }
}
