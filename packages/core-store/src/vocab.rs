//! SPDX vocabulary: property names, class names and well-known URIs.
//!
//! Property names are the names used inside the store. Scalar properties
//! share their name with the serialized field; collection properties are
//! stored under the singular form (`annotation`) and serialized under the
//! plural form (`annotations`).

/// Namespace of the SPDX RDF vocabulary.
pub const SPDX_NAMESPACE: &str = "http://spdx.org/rdf/terms#";

/// Prefix of the listed external reference types.
pub const LISTED_REFERENCE_TYPE_PREFIX: &str = "http://spdx.org/rdf/references/";

pub const URI_VALUE_NONE: &str = "http://spdx.org/rdf/terms#none";
pub const URI_VALUE_NOASSERTION: &str = "http://spdx.org/rdf/terms#noassertion";
pub const NONE_VALUE: &str = "NONE";
pub const NOASSERTION_VALUE: &str = "NOASSERTION";

/// Fixed identifier of the document object inside its namespace.
pub const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";

pub const SPDX_REF_PREFIX: &str = "SPDXRef-";
pub const LICENSE_REF_PREFIX: &str = "LicenseRef-";
pub const DOCUMENT_REF_PREFIX: &str = "DocumentRef-";
/// Prefix of generated anonymous identifiers.
pub const ANON_PREFIX: &str = "__anon__";

// Identifier fields
pub const SPDX_IDENTIFIER: &str = "SPDXID";
pub const PROP_LICENSE_ID: &str = "licenseId";
pub const PROP_LICENSE_EXCEPTION_ID: &str = "licenseExceptionId";
pub const PROP_EXTERNAL_DOCUMENT_ID: &str = "externalDocumentId";

// Document
pub const PROP_DOCUMENT_NAMESPACE: &str = "documentNamespace";
pub const PROP_SPDX_VERSION: &str = "spdxVersion";
pub const PROP_CREATION_INFO: &str = "creationInfo";
pub const PROP_NAME: &str = "name";
pub const PROP_DATA_LICENSE: &str = "dataLicense";
pub const PROP_COMMENT: &str = "comment";
pub const PROP_EXTERNAL_DOCUMENT_REF: &str = "externalDocumentRef";
pub const PROP_DOCUMENT_DESCRIBES: &str = "documentDescribes";
pub const PROP_DOCUMENT_PACKAGES: &str = "packages";
pub const PROP_DOCUMENT_FILES: &str = "files";
pub const PROP_DOCUMENT_SNIPPETS: &str = "snippets";
pub const PROP_DOCUMENT_RELATIONSHIPS: &str = "relationships";
pub const PROP_EXTRACTED_LICENSE: &str = "hasExtractedLicensingInfo";
pub const PROP_ANNOTATION: &str = "annotation";
pub const PROP_EXTERNAL_SPDX_DOCUMENT: &str = "spdxDocument";

// Relationships
pub const PROP_RELATIONSHIP: &str = "relationship";
pub const PROP_RELATIONSHIP_TYPE: &str = "relationshipType";
pub const PROP_RELATED_ELEMENT: &str = "relatedSpdxElement";
pub const PROP_ELEMENT_ID: &str = "spdxElementId";
pub const PROP_PACKAGE_FILE: &str = "hasFile";

// Pointers
pub const PROP_POINTER_OFFSET: &str = "offset";
pub const PROP_POINTER_LINE_NUMBER: &str = "lineNumber";

// External references
pub const PROP_REFERENCE_CATEGORY: &str = "referenceCategory";
pub const PROP_REFERENCE_TYPE: &str = "referenceType";
pub const PROP_REFERENCE_LOCATOR: &str = "referenceLocator";

// Licenses
pub const PROP_LICENSE_INFO_FROM_FILES: &str = "licenseInfoFromFiles";
pub const PROP_LICENSE_SET_MEMBER: &str = "member";
pub const PROP_LICENSE_EXCEPTION: &str = "licenseException";

// Classes
pub const CLASS_SPDX_DOCUMENT: &str = "SpdxDocument";
pub const CLASS_SPDX_PACKAGE: &str = "Package";
pub const CLASS_SPDX_FILE: &str = "File";
pub const CLASS_SPDX_SNIPPET: &str = "Snippet";
pub const CLASS_SPDX_ELEMENT: &str = "SpdxElement";
pub const CLASS_SPDX_ITEM: &str = "SpdxItem";
pub const CLASS_RELATIONSHIP: &str = "Relationship";
pub const CLASS_ANNOTATION: &str = "Annotation";
pub const CLASS_CHECKSUM: &str = "Checksum";
pub const CLASS_CREATION_INFO: &str = "CreationInfo";
pub const CLASS_EXTERNAL_REF: &str = "ExternalRef";
pub const CLASS_EXTERNAL_DOC_REF: &str = "ExternalDocumentRef";
pub const CLASS_PACKAGE_VERIFICATION_CODE: &str = "PackageVerificationCode";
pub const CLASS_CROSS_REF: &str = "CrossRef";
pub const CLASS_REFERENCE_TYPE: &str = "ReferenceType";
pub const CLASS_START_END_POINTER: &str = "StartEndPointer";
pub const CLASS_SINGLE_POINTER: &str = "SinglePointer";
pub const CLASS_BYTE_OFFSET_POINTER: &str = "ByteOffsetPointer";
pub const CLASS_LINE_CHAR_POINTER: &str = "LineCharPointer";

pub const CLASS_ANY_LICENSE_INFO: &str = "AnyLicenseInfo";
pub const CLASS_SIMPLE_LICENSING_INFO: &str = "SimpleLicensingInfo";
pub const CLASS_LICENSE: &str = "License";
pub const CLASS_LISTED_LICENSE: &str = "ListedLicense";
pub const CLASS_EXTRACTED_LICENSING_INFO: &str = "ExtractedLicensingInfo";
pub const CLASS_CONJUNCTIVE_LICENSE_SET: &str = "ConjunctiveLicenseSet";
pub const CLASS_DISJUNCTIVE_LICENSE_SET: &str = "DisjunctiveLicenseSet";
pub const CLASS_OR_LATER_OPERATOR: &str = "OrLaterOperator";
pub const CLASS_WITH_EXCEPTION_OPERATOR: &str = "WithExceptionOperator";
pub const CLASS_LISTED_LICENSE_EXCEPTION: &str = "ListedLicenseException";

// Enumeration classes
pub const ENUM_RELATIONSHIP_TYPE: &str = "RelationshipType";
pub const ENUM_CHECKSUM_ALGORITHM: &str = "ChecksumAlgorithm";
pub const ENUM_ANNOTATION_TYPE: &str = "AnnotationType";
pub const ENUM_REFERENCE_CATEGORY: &str = "ReferenceCategory";
pub const ENUM_FILE_TYPE: &str = "FileType";
pub const ENUM_PURPOSE: &str = "Purpose";

/// External reference types with a listed URI under
/// [`LISTED_REFERENCE_TYPE_PREFIX`].
pub const LISTED_REFERENCE_TYPES: &[&str] = &[
    "cpe22Type",
    "cpe23Type",
    "advisory",
    "fix",
    "url",
    "swid",
    "maven-central",
    "npm",
    "nuget",
    "bower",
    "purl",
    "swh",
    "gitoid",
];
