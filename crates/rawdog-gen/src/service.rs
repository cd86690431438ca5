//! Service/repository interface pairs from `*Service` receiver methods.
//!
//! The service is a pass-through: `I<Base>Service` and `I<Base>Repo` share
//! one method set, and every service method delegates to the held repo.

use rawdog_core::error::ModelError;
use rawdog_core::model::{FileModel, Method, ServiceMethodSet};
use rawdog_core::policy;

use crate::signature::{call_args, method_spec, param_list, result_clause};
use crate::text::{TextBuilder, article};

const RECEIVER: &str = "s";

/// Service pairs for every service receiver in `model`, in one
/// `package <domain_package>` file.
pub fn synthesize_services(
    model: &FileModel,
    domain_package: &str,
) -> Result<String, ModelError> {
    if model.services.is_empty() {
        return Err(ModelError::NoService);
    }
    let mut out = TextBuilder::new();
    out.line(format!("package {domain_package}"));
    for set in &model.services {
        out.blank().raw(&render_service(set));
    }
    Ok(strip_qualifier(&out.finish(), domain_package))
}

/// The service pair for one receiver, with `domain_package.` removed.
pub fn synthesize_service(set: &ServiceMethodSet, domain_package: &str) -> String {
    strip_qualifier(&render_service(set), domain_package)
}

fn render_service(set: &ServiceMethodSet) -> String {
    let base = set.base_name();
    let service = policy::service_name(base);
    let repo = policy::repo_name(base);
    let service_iface = policy::interface_name(&service);
    let repo_iface = policy::interface_name(&repo);

    let mut out = TextBuilder::new();

    out.line(format!("// {service_iface} is the interface for {base} items."));
    interface_block(&mut out, &service_iface, &set.methods);
    out.blank();
    out.line(format!(
        "// {repo_iface} represents the service for storage of {base} items."
    ));
    interface_block(&mut out, &repo_iface, &set.methods);

    out.blank();
    out.line(format!("// {service} implements the service for {base} items."));
    out.open(format!("type {service} struct {{"));
    out.line(format!("repo {repo_iface}"));
    out.close();

    out.blank();
    out.line(format!(
        "// New{service} returns the service for managing {base} items."
    ));
    out.open(format!("func New{service}(repo {repo_iface}) *{service} {{"));
    out.line(format!("{RECEIVER} := new({service})"));
    out.line(format!("{RECEIVER}.repo = repo"));
    out.line(format!("return {RECEIVER}"));
    out.close();

    for method in &set.methods {
        out.blank();
        out.line(format!("// {}", method_comment(&method.name, base)));
        out.open(format!(
            "func ({RECEIVER} *{service}) {}({}){} {{",
            method.name,
            param_list(&method.params, RECEIVER),
            result_clause(&method.returns)
        ));
        let call = format!(
            "{RECEIVER}.repo.{}({})",
            method.name,
            call_args(&method.params, RECEIVER)
        );
        if method.returns.is_empty() {
            out.line(call);
        } else {
            out.line(format!("return {call}"));
        }
        out.close();
    }

    out.finish()
}

fn interface_block(out: &mut TextBuilder, name: &str, methods: &[Method]) {
    out.open(format!("type {name} interface {{"));
    for method in methods {
        out.line(method_spec(method));
    }
    out.close();
}

/// Doc comment by method family.
fn method_comment(name: &str, base: &str) -> String {
    if name.starts_with("All") {
        format!("{name} gets all {base} records.")
    } else if name == "DeleteByID" {
        format!("{name} marks {} {base} record as deleted.", article(base))
    } else if let Some(key) = name.strip_prefix("By") {
        format!("{name} gets {base} records by {key}.")
    } else if name == "Store" {
        format!("{name} stores {} {base} record.", article(base))
    } else {
        format!("{name} delegates to the {base} repository.")
    }
}

/// Remove every `qualifier.` that starts an identifier, leaving names such as
/// `subdomain.X` alone.
pub fn strip_qualifier(text: &str, qualifier: &str) -> String {
    if qualifier.is_empty() {
        return text.to_string();
    }
    let needle = format!("{qualifier}.");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(&needle) {
        let prev = rest[..pos]
            .chars()
            .next_back()
            .or_else(|| out.chars().next_back());
        let starts_ident = prev.is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '.'));
        out.push_str(&rest[..pos]);
        if !starts_ident {
            out.push_str(&needle);
        }
        rest = &rest[pos + needle.len()..];
    }
    out.push_str(rest);
    out
}
