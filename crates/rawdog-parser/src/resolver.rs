//! Classify type expressions into [`TypeSignature`]s.
//!
//! Resolution is partial: shapes outside the closed grammar (maps, channels,
//! funcs, arrays, generics) resolve to `None` and the caller decides whether
//! to drop the slot or report it.

use rawdog_core::model::TypeSignature;
use rawdog_core::policy;

use crate::declarations::TypeExpr;

/// Resolve `expr` declared in `namespace`, qualifying bare non-primitive names.
pub fn resolve(expr: &TypeExpr, namespace: &str) -> Option<TypeSignature> {
    resolve_with(expr, namespace, true)
}

/// Resolve with explicit control over qualification of a bare name.
///
/// Wrapper shapes always resolve their element with qualification on, so a
/// name nested under `[]`, `*` or `...` is qualified regardless of `qualify`.
/// The package half of `pkg.Name` is resolved with qualification off.
pub fn resolve_with(expr: &TypeExpr, namespace: &str, qualify: bool) -> Option<TypeSignature> {
    match expr {
        TypeExpr::Name(name) if name == policy::ANY_TYPE => {
            Some(TypeSignature::open(policy::ANY_TYPE))
        }
        TypeExpr::Name(name) => Some(TypeSignature::value(qualified_name(
            name, namespace, qualify,
        ))),
        TypeExpr::Slice(inner) => {
            resolve_with(inner, namespace, true).map(TypeSignature::sequence)
        }
        TypeExpr::Pointer(inner) => {
            resolve_with(inner, namespace, true).map(TypeSignature::pointer)
        }
        TypeExpr::Variadic(inner) => {
            resolve_with(inner, namespace, true).map(TypeSignature::variadic)
        }
        TypeExpr::Open => Some(TypeSignature::open(policy::OPEN_TYPE)),
        TypeExpr::Qualified { package, name } => {
            resolve_with(package, namespace, false)
                .map(|prefix| TypeSignature::qualified(&prefix, name))
        }
        TypeExpr::Unsupported { .. } => None,
    }
}

fn qualified_name(name: &str, namespace: &str, qualify: bool) -> String {
    if !qualify || namespace.is_empty() || policy::is_primitive(name) {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawdog_core::model::TypeKind;

    fn name(n: &str) -> TypeExpr {
        TypeExpr::Name(n.to_string())
    }

    #[test]
    fn test_bare_custom_name_is_qualified() {
        let sig = resolve(&name("Widget"), "store").unwrap();
        assert_eq!(sig.kind, TypeKind::Value);
        assert_eq!(sig.rendered, "store.Widget");
    }

    #[test]
    fn test_unqualified_call_keeps_bare_name() {
        let sig = resolve_with(&name("Widget"), "store", false).unwrap();
        assert_eq!(sig.rendered, "Widget");
    }

    #[test]
    fn test_sequence_forces_qualification() {
        let sig = resolve_with(&TypeExpr::Slice(Box::new(name("Widget"))), "store", false).unwrap();
        assert_eq!(sig.rendered, "[]store.Widget");
        assert_eq!(sig.kind, TypeKind::Sequence);
    }

    #[test]
    fn test_selector_is_not_requalified() {
        let expr = TypeExpr::Qualified {
            package: Box::new(name("sql")),
            name: "Result".to_string(),
        };
        let sig = resolve(&expr, "store").unwrap();
        assert_eq!(sig.rendered, "sql.Result");
        assert_eq!(sig.kind, TypeKind::QualifiedValue);
    }

    #[test]
    fn test_open_types() {
        assert_eq!(resolve(&TypeExpr::Open, "store").unwrap().rendered, "interface{}");
        let any = resolve(&name("any"), "store").unwrap();
        assert_eq!(any.kind, TypeKind::OpenType);
        assert_eq!(any.rendered, "any");
    }

    #[test]
    fn test_unsupported_is_unresolved() {
        let expr = TypeExpr::Unsupported {
            kind: "map_type".to_string(),
            text: "map[string]int".to_string(),
        };
        assert!(resolve(&expr, "store").is_none());
        assert!(resolve(&TypeExpr::Pointer(Box::new(expr)), "store").is_none());
    }

    #[test]
    fn test_empty_namespace_never_qualifies() {
        assert_eq!(resolve(&name("Widget"), "").unwrap().rendered, "Widget");
    }
}
