//! YAML codec.

use bytes::Bytes;
use spdx_core_store::{Codec, Error, Format, Value};

use crate::convert::{json_to_value, value_to_json};

/// Encodes and decodes YAML through the JSON data model.
///
/// Mappings must have string keys, which every SPDX document does.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(*format));
        }

        let json: serde_json::Value =
            serde_yaml::from_slice(bytes).map_err(|e| Error::decode(*format, e.to_string()))?;

        Ok(json_to_value(json))
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(*format));
        }

        let text = serde_yaml::to_string(&value_to_json(value))
            .map_err(|e| Error::encode(*format, e.to_string()))?;

        Ok(Bytes::from(text))
    }

    fn supports(&self, format: &Format) -> bool {
        *format == Format::Yaml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_documents() {
        let text = "\
name: zlib
filesAnalyzed: false
checksums:
  - algorithm: SHA1
    checksumValue: 85ed0817af83a24ad8da68c2b5094de69833983c
";
        let value = YamlCodec
            .decode(&Bytes::from(text), &Format::Yaml)
            .unwrap();

        assert_eq!(value.get_str("name"), Some("zlib"));
        assert_eq!(value.get("filesAnalyzed"), Some(&Value::Bool(false)));
        let checksums = value.get("checksums").and_then(Value::as_array).unwrap();
        assert_eq!(checksums[0].get_str("algorithm"), Some("SHA1"));
    }

    #[test]
    fn roundtrip_keeps_field_order() {
        let text = "zeta: 1\nalpha: two\n";
        let value = YamlCodec.decode(&Bytes::from(text), &Format::Yaml).unwrap();
        let encoded = YamlCodec.encode(&value, &Format::Yaml).unwrap();
        assert_eq!(std::str::from_utf8(&encoded).unwrap(), text);
    }

    #[test]
    fn rejects_json_format() {
        let result = YamlCodec.encode(&Value::Null, &Format::Json);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn malformed_yaml_is_a_decode_error() {
        let result = YamlCodec.decode(&Bytes::from("a: [unclosed"), &Format::Yaml);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
