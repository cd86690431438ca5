//! Rendering of method signatures shared by the mock and service synthesizers.

use std::collections::HashSet;

use rawdog_core::model::{Method, Param};
use rawdog_core::{policy, zero_value};

/// Type text of a slot. An unresolved slot renders as the open type so the
/// surrounding declaration stays well-formed.
pub fn slot_type(param: &Param) -> &str {
    match &param.signature {
        Some(sig) => &sig.rendered,
        None => policy::OPEN_TYPE,
    }
}

/// Parameter names usable in a method on `receiver`.
///
/// Unnamed slots and slots named like the receiver become `argN`. A generated
/// name never collides with a declared one or with the receiver; an empty
/// `receiver` reserves nothing.
pub fn param_names(params: &[Param], receiver: &str) -> Vec<String> {
    let keeps = |name: &str| !name.is_empty() && name != "_" && name != receiver;
    let mut taken: HashSet<String> = params
        .iter()
        .filter(|p| keeps(&p.name))
        .map(|p| p.name.clone())
        .collect();
    if !receiver.is_empty() {
        taken.insert(receiver.to_string());
    }
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if keeps(&p.name) {
                return p.name.clone();
            }
            let mut name = format!("arg{i}");
            while taken.contains(&name) {
                name.push('_');
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

/// `id string, opts ...any`
pub fn param_list(params: &[Param], receiver: &str) -> String {
    param_names(params, receiver)
        .iter()
        .zip(params)
        .map(|(name, p)| format!("{name} {}", slot_type(p)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result clause including its leading space: `""`, `" error"` or
/// `" (*Widget, error)"`. Return names are not carried over.
pub fn result_clause(returns: &[Param]) -> String {
    match returns {
        [] => String::new(),
        [single] => format!(" {}", slot_type(single)),
        many => format!(
            " ({})",
            many.iter().map(slot_type).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Call arguments forwarding every parameter, spreading a variadic one.
/// Names match [`param_list`] for the same `receiver`.
pub fn call_args(params: &[Param], receiver: &str) -> String {
    param_names(params, receiver)
        .into_iter()
        .zip(params)
        .map(|(name, p)| {
            if p.is_variadic() {
                format!("{name}...")
            } else {
                name
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Zero-value expression list for every return slot.
pub fn zero_returns(returns: &[Param]) -> String {
    returns
        .iter()
        .map(zero_value::zero_value_of)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Name(params) results`, the form used inside an interface body.
pub fn method_spec(method: &Method) -> String {
    format!(
        "{}({}){}",
        method.name,
        param_list(&method.params, ""),
        result_clause(&method.returns)
    )
}

/// `func(params) results`, the form used for a callback field.
pub fn func_type(method: &Method) -> String {
    format!(
        "func({}){}",
        param_list(&method.params, ""),
        result_clause(&method.returns)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawdog_core::model::TypeSignature;

    fn param(name: &str, sig: TypeSignature) -> Param {
        Param::new(name, Some(sig))
    }

    #[test]
    fn test_unnamed_params_get_positional_names() {
        let params = vec![
            param("", TypeSignature::value("string")),
            param("n", TypeSignature::value("int")),
            param("", TypeSignature::value("bool")),
        ];
        assert_eq!(param_list(&params, "m"), "arg0 string, n int, arg2 bool");
        assert_eq!(call_args(&params, "m"), "arg0, n, arg2");
    }

    #[test]
    fn test_receiver_name_is_never_a_parameter() {
        let params = vec![
            param("s", TypeSignature::value("string")),
            param("n", TypeSignature::value("int")),
        ];
        assert_eq!(param_list(&params, "s"), "arg0 string, n int");
        assert_eq!(call_args(&params, "s"), "arg0, n");
        assert_eq!(param_list(&params, ""), "s string, n int");
    }

    #[test]
    fn test_positional_names_avoid_declared_names() {
        let params = vec![
            param("", TypeSignature::value("string")),
            param("arg0", TypeSignature::value("int")),
            param("m", TypeSignature::value("bool")),
        ];
        assert_eq!(param_names(&params, "m"), vec!["arg0_", "arg0", "arg2"]);
    }

    #[test]
    fn test_variadic_is_spread_in_calls() {
        let params = vec![
            param("q", TypeSignature::value("string")),
            param("args", TypeSignature::variadic(TypeSignature::open("any"))),
        ];
        assert_eq!(param_list(&params, "m"), "q string, args ...any");
        assert_eq!(call_args(&params, "m"), "q, args...");
    }

    #[test]
    fn test_result_clause_shapes() {
        let err = param("", TypeSignature::value("error"));
        let ptr = param("", TypeSignature::pointer(TypeSignature::value("pkg.Widget")));
        assert_eq!(result_clause(&[]), "");
        assert_eq!(result_clause(std::slice::from_ref(&err)), " error");
        assert_eq!(result_clause(&[ptr, err]), " (*pkg.Widget, error)");
    }

    #[test]
    fn test_unresolved_slot_renders_open_type() {
        let params = vec![Param::new("m", None)];
        assert_eq!(param_list(&params, ""), "m interface{}");
        assert_eq!(zero_returns(&params), "nil");
    }
}
