//! JSON codec and codec routing.

use bytes::Bytes;
use spdx_core_store::{Codec, Error, Format, Value};

use crate::convert::{json_to_value, value_to_json};
use crate::xml::XmlCodec;
use crate::yaml::YamlCodec;

/// A codec that handles JSON encoding/decoding.
///
/// Decodes both JSON formats the same way; `Format::JsonPretty` only changes
/// how documents are encoded.
///
/// # Example
///
/// ```rust
/// use spdx_serde_store::JsonCodec;
/// use spdx_core_store::{Codec, Format, Value};
///
/// let codec = JsonCodec;
/// let value = Value::from("hello");
///
/// let bytes = codec.encode(&value, &Format::Json).unwrap();
/// let decoded = codec.decode(&bytes, &Format::Json).unwrap();
///
/// assert_eq!(decoded, value);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(*format));
        }

        let json: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| Error::decode(*format, e.to_string()))?;

        Ok(json_to_value(json))
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(*format));
        }

        let json = value_to_json(value);
        let bytes = if *format == Format::JsonPretty {
            serde_json::to_vec_pretty(&json)
        } else {
            serde_json::to_vec(&json)
        }
        .map_err(|e| Error::encode(*format, e.to_string()))?;

        Ok(Bytes::from(bytes))
    }

    fn supports(&self, format: &Format) -> bool {
        format.is_json()
    }
}

/// A codec that combines multiple codecs.
///
/// Routes encode/decode to the appropriate codec based on format.
pub struct MultiCodec {
    codecs: Vec<Box<dyn Codec>>,
}

impl MultiCodec {
    /// Create an empty multi-codec.
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Add a codec.
    pub fn add(&mut self, codec: impl Codec + 'static) {
        self.codecs.push(Box::new(codec));
    }

    /// Create a multi-codec with the JSON codec included.
    pub fn with_json() -> Self {
        let mut mc = Self::new();
        mc.add(JsonCodec);
        mc
    }

    /// Create a multi-codec covering every SPDX document format.
    pub fn all_formats() -> Self {
        let mut mc = Self::with_json();
        mc.add(YamlCodec);
        mc.add(XmlCodec::spdx_document());
        mc
    }
}

impl Default for MultiCodec {
    fn default() -> Self {
        Self::all_formats()
    }
}

impl Codec for MultiCodec {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        for codec in &self.codecs {
            if codec.supports(format) {
                return codec.decode(bytes, format);
            }
        }
        Err(Error::UnsupportedFormat(*format))
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        for codec in &self.codecs {
            if codec.supports(format) {
                return codec.encode(value, format);
            }
        }
        Err(Error::UnsupportedFormat(*format))
    }

    fn supports(&self, format: &Format) -> bool {
        self.codecs.iter().any(|c| c.supports(format))
    }
}
