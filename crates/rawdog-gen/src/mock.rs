//! Test doubles for interface contracts.
//!
//! `Mock<Interface>` carries one `<Method>Callback` field per method. Each
//! forwarding method calls its callback when set, and otherwise returns the
//! zero value of every result.

use rawdog_core::model::{FileModel, Interface, Method};
use rawdog_core::policy;

use crate::signature::{call_args, func_type, param_list, result_clause, zero_returns};
use crate::text::TextBuilder;

/// First line of every mock file.
pub const MOCK_HEADER: &str = "// Generated by Rawdog";

const RECEIVER: &str = "m";

/// Mocks for every interface in `model` that declares at least one method.
pub fn synthesize_mocks(model: &FileModel) -> String {
    let mut out = TextBuilder::new();
    out.line(MOCK_HEADER);
    for iface in &model.interfaces {
        if iface.methods.is_empty() {
            tracing::debug!("skipping {}: no methods", iface.name);
            continue;
        }
        out.blank().raw(&synthesize_mock(iface));
    }
    out.finish()
}

/// The mock declaration for one interface.
pub fn synthesize_mock(iface: &Interface) -> String {
    let mock = policy::mock_name(&iface.name);
    let mut out = TextBuilder::new();

    out.line(format!(
        "// {mock} is a configurable stand-in for {}.{}.",
        iface.namespace, iface.name
    ));
    let callbacks: Vec<(String, String)> = iface
        .methods
        .iter()
        .map(|method| (policy::callback_name(&method.name), func_type(method)))
        .collect();
    out.open(format!("type {mock} struct {{"));
    out.fields(&callbacks);
    out.close();

    for method in &iface.methods {
        out.blank();
        forwarding_method(&mut out, &mock, method);
    }

    out.blank();
    out.line("// ResetMock clears every callback.");
    out.open(format!("func ({RECEIVER} *{mock}) ResetMock() {{"));
    for method in &iface.methods {
        out.line(format!("{RECEIVER}.{} = nil", policy::callback_name(&method.name)));
    }
    out.close();

    out.finish()
}

fn forwarding_method(out: &mut TextBuilder, mock: &str, method: &Method) {
    let callback = policy::callback_name(&method.name);
    let call = format!(
        "{RECEIVER}.{callback}({})",
        call_args(&method.params, RECEIVER)
    );

    out.open(format!(
        "func ({RECEIVER} *{mock}) {}({}){} {{",
        method.name,
        param_list(&method.params, RECEIVER),
        result_clause(&method.returns)
    ));
    out.open(format!("if {RECEIVER}.{callback} != nil {{"));
    if method.returns.is_empty() {
        out.line(call).line("return");
    } else {
        out.line(format!("return {call}"));
    }
    out.close();
    if !method.returns.is_empty() {
        out.line(format!("return {}", zero_returns(&method.returns)));
    }
    out.close();
}
