//! Naming conventions shared by the model builder and every synthesizer.
//!
//! These are hard conventions, not configuration. Changing one here changes
//! it for every artifact family at once.

/// Field name that ends the persisted-column scan of a record.
pub const SENTINEL_FIELD: &str = "CreatedAt";

/// Column suffix marking a foreign-key-like reference.
pub const RELATION_SUFFIX: &str = "_id";

/// Receiver type suffix that marks a service method set.
pub const SERVICE_SUFFIX: &str = "Service";

/// Suffix of the repository type paired with a service.
pub const REPO_SUFFIX: &str = "Repo";

/// Suffix of the sibling record carrying joined-relation data.
pub const AUGMENTED_SUFFIX: &str = "Augmented";

/// Suffix of the overridable callback field on a mock.
pub const CALLBACK_SUFFIX: &str = "Callback";

/// Prefix of a generated mock type.
pub const MOCK_PREFIX: &str = "Mock";

/// Prefix of a generated interface type.
pub const INTERFACE_PREFIX: &str = "I";

/// Name of the identity field of an entity.
pub const IDENTITY_FIELD: &str = "ID";

/// Struct tag key carrying the persisted column name.
pub const COLUMN_TAG_KEY: &str = "db";

/// Identity column referenced by joins and lookups.
pub const IDENTITY_COLUMN: &str = "id";

/// Soft-delete marker column.
pub const DELETED_AT_COLUMN: &str = "deleted_at";

/// The empty-interface spelling of the open type.
pub const OPEN_TYPE: &str = "interface{}";

/// The predeclared alias of the open type.
pub const ANY_TYPE: &str = "any";

/// Names that are never qualified with a namespace prefix.
pub const PRIMITIVES: &[&str] = &[
    "bool",
    "string",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "byte",
    "rune",
    "float32",
    "float64",
    "complex64",
    "complex128",
    "error",
    "interface",
    ANY_TYPE,
];

/// Signed and unsigned integer names, including the byte and rune aliases.
pub const INTEGER_TYPES: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr", "byte", "rune",
];

/// Floating-point names.
pub const FLOAT_TYPES: &[&str] = &["float32", "float64"];

/// Complex-number names.
pub const COMPLEX_TYPES: &[&str] = &["complex64", "complex128"];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

pub fn is_integer(name: &str) -> bool {
    INTEGER_TYPES.contains(&name)
}

pub fn is_float(name: &str) -> bool {
    FLOAT_TYPES.contains(&name)
}

pub fn is_complex(name: &str) -> bool {
    COMPLEX_TYPES.contains(&name)
}

/// Strip the service suffix from a receiver type name, if present.
///
/// `AccountService` → `Some("Account")`, `Account` → `None`.
pub fn service_base(receiver: &str) -> Option<&str> {
    receiver.strip_suffix(SERVICE_SUFFIX)
}

/// `Account` → `AccountAugmented`.
pub fn augmented_name(entity: &str) -> String {
    format!("{entity}{AUGMENTED_SUFFIX}")
}

/// `Account` → `AccountService`.
pub fn service_name(base: &str) -> String {
    format!("{base}{SERVICE_SUFFIX}")
}

/// `Account` → `AccountRepo`.
pub fn repo_name(base: &str) -> String {
    format!("{base}{REPO_SUFFIX}")
}

/// `AccountRepo` → `IAccountRepo`.
pub fn interface_name(name: &str) -> String {
    format!("{INTERFACE_PREFIX}{name}")
}

/// `Get` → `GetCallback`.
pub fn callback_name(method: &str) -> String {
    format!("{method}{CALLBACK_SUFFIX}")
}

/// `Store` → `MockStore`.
pub fn mock_name(interface: &str) -> String {
    format!("{MOCK_PREFIX}{interface}")
}
