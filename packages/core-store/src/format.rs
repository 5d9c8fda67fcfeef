//! Wire format and verbosity selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The wire format of a serialized SPDX document.
///
/// `Json` and `JsonPretty` decode identically; they only differ in how
/// documents are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Compact JSON.
    #[default]
    Json,
    /// Indented JSON.
    JsonPretty,
    /// XML with a `Document` root element.
    Xml,
    /// YAML.
    Yaml,
}

impl Format {
    /// Every supported format.
    pub const ALL: [Format; 4] = [Format::Json, Format::JsonPretty, Format::Xml, Format::Yaml];

    /// Get the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::JsonPretty => "json-pretty",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
        }
    }

    /// Check if this is one of the JSON formats.
    pub fn is_json(&self) -> bool {
        matches!(self, Format::Json | Format::JsonPretty)
    }

    /// Check if this is XML.
    pub fn is_xml(&self) -> bool {
        matches!(self, Format::Xml)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "json-pretty" | "json_pretty" => Ok(Format::JsonPretty),
            "xml" => Ok(Format::Xml),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(Error::Other {
                message: format!("unknown format: {}", other),
            }),
        }
    }
}

/// How much of the object graph is expanded when flattening.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbose {
    /// Licenses as expression strings, referenced elements as bare IDs.
    #[default]
    Compact,
    /// Licenses as expression strings, referenced elements expanded.
    Standard,
    /// Everything expanded to full objects.
    Full,
}

impl Verbose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbose::Compact => "compact",
            Verbose::Standard => "standard",
            Verbose::Full => "full",
        }
    }
}

impl fmt::Display for Verbose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
