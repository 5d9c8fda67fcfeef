use std::sync::Arc;

use serde_json::json;

use spdx_core_store::{Format, JsonLdContext, Value};
use spdx_mem_store::InMemoryStore;
use spdx_multiformat_store::MultiFormatStore;
use spdx_serde_store::json_to_value;

pub const NAMESPACE: &str = "https://example.com/zlib";

pub fn new_store(format: Format) -> MultiFormatStore {
    MultiFormatStore::with_format(
        Arc::new(InMemoryStore::new()),
        Arc::new(JsonLdContext::spdx_2_3().unwrap()),
        format,
    )
}

/// A compact document exercising every kind of value the store handles.
pub fn sample_document() -> serde_json::Value {
    json!({
        "SPDXID": "SPDXRef-DOCUMENT",
        "spdxVersion": "SPDX-2.3",
        "creationInfo": {
            "created": "2024-05-01T12:00:00Z",
            "creators": ["Tool: spdx-store", "Organization: Example"],
            "licenseListVersion": "3.23"
        },
        "name": "zlib-sbom",
        "dataLicense": "CC0-1.0",
        "comment": "sample document",
        "externalDocumentRefs": [{
            "externalDocumentId": "DocumentRef-libc",
            "spdxDocument": "https://example.com/libc",
            "checksum": {
                "algorithm": "SHA1",
                "checksumValue": "d6a770ba38583ed4bb4525bd96e50461655d2759"
            }
        }],
        "documentDescribes": ["SPDXRef-zlib"],
        "documentNamespace": NAMESPACE,
        "packages": [{
            "SPDXID": "SPDXRef-zlib",
            "name": "zlib",
            "versionInfo": "1.2.13",
            "downloadLocation": "https://zlib.net/zlib-1.2.13.tar.gz",
            "filesAnalyzed": true,
            "licenseConcluded": "Zlib",
            "licenseDeclared": "Zlib OR LicenseRef-zlib-extra",
            "licenseInfoFromFiles": ["Zlib"],
            "copyrightText": "NOASSERTION",
            "primaryPackagePurpose": "LIBRARY",
            "checksums": [
                {"algorithm": "SHA256", "checksumValue": "b3a24de97a8fdbc835b9833169501030b8977031bcb54b3b3ac13740f846ab30"},
                {"algorithm": "MD5", "checksumValue": "9b8aa094c4e5765dabf4da391f00d15c"}
            ],
            "externalRefs": [{
                "referenceCategory": "PACKAGE-MANAGER",
                "referenceType": "purl",
                "referenceLocator": "pkg:generic/zlib@1.2.13"
            }],
            "hasFiles": ["SPDXRef-adler32", "SPDXRef-zlib-h"]
        }],
        "files": [
            {
                "SPDXID": "SPDXRef-adler32",
                "fileName": "./adler32.c",
                "fileTypes": ["SOURCE"],
                "checksums": [{"algorithm": "SHA1", "checksumValue": "6ac2e8e5a1a1c1dd8e2b1c1f2e1a6f0f9e1f1c3b"}],
                "licenseConcluded": "Zlib",
                "licenseInfoInFiles": ["Zlib"],
                "copyrightText": "Copyright (C) 1995-2011 Mark Adler"
            },
            {
                "SPDXID": "SPDXRef-zlib-h",
                "fileName": "./zlib.h",
                "fileTypes": ["SOURCE"],
                "checksums": [{"algorithm": "SHA1", "checksumValue": "0b6b2e1c2b6e9a4b3f4b6a2f8b9a3c1d2e4f5a6b"}],
                "licenseConcluded": "Zlib AND (MIT OR BSD-3-Clause)",
                "copyrightText": "Copyright (C) 1995-2022 Jean-loup Gailly and Mark Adler"
            }
        ],
        "snippets": [{
            "SPDXID": "SPDXRef-snippet",
            "name": "adler32 core",
            "snippetFromFile": "SPDXRef-adler32",
            "licenseConcluded": "GPL-2.0-or-later WITH Classpath-exception-2.0",
            "ranges": [
                {
                    "startPointer": {"offset": 310, "reference": "SPDXRef-adler32"},
                    "endPointer": {"offset": 420, "reference": "SPDXRef-adler32"}
                },
                {
                    "startPointer": {"lineNumber": 5, "reference": "SPDXRef-adler32"},
                    "endPointer": {"lineNumber": 23, "reference": "SPDXRef-adler32"}
                }
            ]
        }],
        "hasExtractedLicensingInfos": [{
            "licenseId": "LicenseRef-zlib-extra",
            "name": "zlib extra",
            "extractedText": "Extra terms for the zlib distribution."
        }],
        "annotations": [{
            "annotationDate": "2024-05-02T08:30:00Z",
            "annotationType": "REVIEW",
            "annotator": "Person: Jane Doe",
            "comment": "Checked against upstream"
        }],
        "relationships": [
            {
                "spdxElementId": "SPDXRef-zlib",
                "relationshipType": "DEPENDS_ON",
                "relatedSpdxElement": "DocumentRef-libc:SPDXRef-libc"
            },
            {
                "spdxElementId": "SPDXRef-snippet",
                "relationshipType": "OTHER",
                "relatedSpdxElement": "NOASSERTION",
                "comment": "provenance unknown"
            },
            {
                "spdxElementId": "SPDXRef-zlib-h",
                "relationshipType": "GENERATED_FROM",
                "relatedSpdxElement": "NONE"
            }
        ]
    })
}

pub fn to_bytes(document: &serde_json::Value) -> bytes::Bytes {
    serde_json::to_vec(document).unwrap().into()
}

pub fn parse_json(bytes: &[u8]) -> Value {
    json_to_value(serde_json::from_slice(bytes).unwrap())
}
