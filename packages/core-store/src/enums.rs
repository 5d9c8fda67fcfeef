//! SPDX enumerations and the URIs of their members.
//!
//! Enumeration values are stored as [`IndividualUriValue`](crate::IndividualUriValue)s
//! and serialized by member name.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::vocab::{
    ENUM_ANNOTATION_TYPE, ENUM_CHECKSUM_ALGORITHM, ENUM_FILE_TYPE, ENUM_PURPOSE,
    ENUM_REFERENCE_CATEGORY, ENUM_RELATIONSHIP_TYPE, SPDX_NAMESPACE,
};

/// One member of an SPDX enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub type_name: &'static str,
    /// Serialized name, e.g. `DESCRIBES` or `SHA3-256`.
    pub name: &'static str,
    pub uri: String,
}

const RELATIONSHIP_TYPES: &[&str] = &[
    "DESCRIBES",
    "DESCRIBED_BY",
    "CONTAINS",
    "CONTAINED_BY",
    "DEPENDS_ON",
    "DEPENDENCY_OF",
    "DEPENDENCY_MANIFEST_OF",
    "BUILD_DEPENDENCY_OF",
    "DEV_DEPENDENCY_OF",
    "OPTIONAL_DEPENDENCY_OF",
    "PROVIDED_DEPENDENCY_OF",
    "TEST_DEPENDENCY_OF",
    "RUNTIME_DEPENDENCY_OF",
    "EXAMPLE_OF",
    "GENERATES",
    "GENERATED_FROM",
    "ANCESTOR_OF",
    "DESCENDANT_OF",
    "VARIANT_OF",
    "DISTRIBUTION_ARTIFACT",
    "PATCH_FOR",
    "PATCH_APPLIED",
    "COPY_OF",
    "FILE_ADDED",
    "FILE_DELETED",
    "FILE_MODIFIED",
    "EXPANDED_FROM_ARCHIVE",
    "DYNAMIC_LINK",
    "STATIC_LINK",
    "DATA_FILE_OF",
    "TEST_CASE_OF",
    "BUILD_TOOL_OF",
    "DEV_TOOL_OF",
    "TEST_OF",
    "TEST_TOOL_OF",
    "DOCUMENTATION_OF",
    "OPTIONAL_COMPONENT_OF",
    "METAFILE_OF",
    "PACKAGE_OF",
    "AMENDS",
    "PREREQUISITE_FOR",
    "HAS_PREREQUISITE",
    "REQUIREMENT_DESCRIPTION_FOR",
    "SPECIFICATION_FOR",
    "OTHER",
];

const CHECKSUM_ALGORITHMS: &[(&str, &str)] = &[
    ("SHA1", "sha1"),
    ("SHA224", "sha224"),
    ("SHA256", "sha256"),
    ("SHA384", "sha384"),
    ("SHA512", "sha512"),
    ("MD2", "md2"),
    ("MD4", "md4"),
    ("MD5", "md5"),
    ("MD6", "md6"),
    ("SHA3-256", "sha3_256"),
    ("SHA3-384", "sha3_384"),
    ("SHA3-512", "sha3_512"),
    ("BLAKE2b-256", "blake2b256"),
    ("BLAKE2b-384", "blake2b384"),
    ("BLAKE2b-512", "blake2b512"),
    ("BLAKE3", "blake3"),
    ("ADLER32", "adler32"),
];

const ANNOTATION_TYPES: &[(&str, &str)] = &[("REVIEW", "review"), ("OTHER", "other")];

const REFERENCE_CATEGORIES: &[(&str, &str)] = &[
    ("SECURITY", "security"),
    ("PACKAGE-MANAGER", "packageManager"),
    ("PERSISTENT-ID", "persistentId"),
    ("OTHER", "other"),
];

const FILE_TYPES: &[(&str, &str)] = &[
    ("SOURCE", "source"),
    ("BINARY", "binary"),
    ("ARCHIVE", "archive"),
    ("APPLICATION", "application"),
    ("AUDIO", "audio"),
    ("IMAGE", "image"),
    ("TEXT", "text"),
    ("VIDEO", "video"),
    ("DOCUMENTATION", "documentation"),
    ("SPDX", "spdx"),
    ("OTHER", "other"),
];

const PURPOSES: &[(&str, &str)] = &[
    ("APPLICATION", "application"),
    ("FRAMEWORK", "framework"),
    ("LIBRARY", "library"),
    ("CONTAINER", "container"),
    ("OPERATING-SYSTEM", "operatingSystem"),
    ("DEVICE", "device"),
    ("FIRMWARE", "firmware"),
    ("SOURCE", "source"),
    ("ARCHIVE", "archive"),
    ("FILE", "file"),
    ("INSTALL", "install"),
    ("OTHER", "other"),
];

/// `DEPENDENCY_MANIFEST_OF` -> `dependencyManifestOf`
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn build_members() -> Vec<EnumMember> {
    let mut members = Vec::new();
    for &name in RELATIONSHIP_TYPES {
        members.push(EnumMember {
            type_name: ENUM_RELATIONSHIP_TYPE,
            name,
            uri: format!("{}relationshipType_{}", SPDX_NAMESPACE, camel_case(name)),
        });
    }
    let tables: [(&'static str, &str, &[(&'static str, &str)]); 5] = [
        (ENUM_CHECKSUM_ALGORITHM, "checksumAlgorithm", CHECKSUM_ALGORITHMS),
        (ENUM_ANNOTATION_TYPE, "annotationType", ANNOTATION_TYPES),
        (ENUM_REFERENCE_CATEGORY, "referenceCategory", REFERENCE_CATEGORIES),
        (ENUM_FILE_TYPE, "fileType", FILE_TYPES),
        (ENUM_PURPOSE, "purpose", PURPOSES),
    ];
    for (type_name, prefix, entries) in tables {
        for &(name, local) in entries {
            members.push(EnumMember {
                type_name,
                name,
                uri: format!("{}{}_{}", SPDX_NAMESPACE, prefix, local),
            });
        }
    }
    members
}

lazy_static! {
    static ref MEMBERS: Vec<EnumMember> = build_members();
    static ref BY_URI: HashMap<&'static str, &'static EnumMember> = MEMBERS
        .iter()
        .map(|member| (member.uri.as_str(), member))
        .collect();
}

/// Check whether a type name is one of the SPDX enumerations.
pub fn is_enum_type(type_name: &str) -> bool {
    MEMBERS.iter().any(|member| member.type_name == type_name)
}

/// Find the member of `type_name` named by `text`.
///
/// Exact names win; otherwise `-` and `_` are treated as equivalent, so
/// `PACKAGE_MANAGER` finds `PACKAGE-MANAGER`.
pub fn find_member(type_name: &str, text: &str) -> Option<&'static EnumMember> {
    let members: &'static Vec<EnumMember> = &MEMBERS;
    let mut candidates = members.iter().filter(|m| m.type_name == type_name);
    if let Some(exact) = candidates.clone().find(|m| m.name == text) {
        return Some(exact);
    }
    let normalized = text.replace('-', "_");
    candidates.find(|m| m.name.replace('-', "_") == normalized)
}

/// Find the member whose URI is `uri`.
pub fn member_by_uri(uri: &str) -> Option<&'static EnumMember> {
    BY_URI.get(uri).copied()
}

/// URI of a relationship type, by name.
pub fn relationship_type_uri(name: &str) -> Option<&'static str> {
    find_member(ENUM_RELATIONSHIP_TYPE, name).map(|m| m.uri.as_str())
}
