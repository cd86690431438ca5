//! Default-value expressions for stub returns.
//!
//! Every synthesizer that needs a safe placeholder value goes through
//! [`zero_value_for`], so mocks and scaffolds agree on the same literals.

use crate::model::{Param, TypeKind, TypeSignature};
use crate::policy;

/// Default expression for a value of the given kind and rendered type.
pub fn zero_value_for(kind: TypeKind, rendered: &str) -> String {
    match kind {
        TypeKind::Value => value_zero(rendered),
        TypeKind::QualifiedValue => format!("{rendered}{{}}"),
        TypeKind::Pointer | TypeKind::Sequence | TypeKind::OpenType => "nil".to_string(),
        // Variadic never appears in a return position.
        TypeKind::Variadic => "nil".to_string(),
    }
}

fn value_zero(rendered: &str) -> String {
    match rendered {
        "string" => "\"\"".to_string(),
        "bool" => "false".to_string(),
        "error" | policy::ANY_TYPE | "interface" => "nil".to_string(),
        name if policy::is_integer(name) || policy::is_float(name) || policy::is_complex(name) => {
            format!("{name}(0)")
        }
        name => format!("{name}{{}}"),
    }
}

/// Default expression for a signature.
pub fn zero_value(signature: &TypeSignature) -> String {
    zero_value_for(signature.kind, &signature.rendered)
}

/// Default expression for a return slot; unresolved slots fall back to `nil`.
pub fn zero_value_of(param: &Param) -> String {
    param
        .signature
        .as_ref()
        .map_or_else(|| "nil".to_string(), zero_value)
}
