//! Web-layer controller stubs.

use rawdog_core::policy;

use crate::text::{TextBuilder, article};

/// Lowercased words of a CamelCase identifier, split before each uppercase
/// letter: `ResourceRole` → `["resource", "role"]`.
pub fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `ResourceRole` → `resource_role`.
pub fn route(name: &str) -> String {
    words(name).join("_")
}

/// `ResourceRole` → `resource role`.
pub fn description(name: &str) -> String {
    words(name).join(" ")
}

/// Controller stub wiring `logic.I<Name>Service` to three routes.
pub fn synthesize_controller(name: &str) -> String {
    let route = route(name);
    let desc = description(name);
    let service = policy::interface_name(&policy::service_name(name));

    let mut out = TextBuilder::new();
    out.line("package controller");
    out.blank();
    out.open("import (");
    out.line("\"lib/router\"");
    out.line("\"net/http\"");
    out.blank();
    out.line("\"app/webapi/logic\"");
    out.line("\"domain\"");
    out.dedent().line(")");
    out.blank();

    out.line(format!(
        "// {name} represents the services required for this controller."
    ));
    out.open(format!("type {name} struct {{"));
    out.fields(&[
        (name.to_string(), format!("logic.{service}")),
        ("View".to_string(), "domain.IViewAdapter".to_string()),
        ("Parser".to_string(), "domain.IViewParser".to_string()),
    ]);
    out.close();
    out.blank();

    out.line(format!(
        "// New{name} returns a new instance of {} {desc}.",
        article(&desc)
    ));
    out.open(format!(
        "func New{name}(svc logic.{service}, v domain.IViewAdapter, p domain.IViewParser) *{name} {{"
    ));
    out.line(format!("s := new({name})"));
    out.line(format!("s.{name} = svc"));
    out.line("s.View = v");
    out.line("s.Parser = p");
    out.line("return s");
    out.close();
    out.blank();

    out.line(format!(
        "// AddRoutes adds routes for interacting with domain {name} via the webapi."
    ));
    out.open(format!("func (h *{name}) AddRoutes() {{"));
    out.line(format!("router.Post(\"/{route}\", h.Store)"));
    out.line(format!("router.Get(\"/{route}\", h.Index)"));
    out.line(format!("router.Get(\"/{route}/:id\", h.Show)"));
    out.close();

    for (handler, doc) in [
        ("Store", format!("saves a new {desc} to the database.")),
        ("Index", format!("shows all {desc} in the system.")),
        (
            "Show",
            format!("returns a particular {desc} with a particular ID in the system."),
        ),
    ] {
        out.blank();
        out.line(format!("// {handler} {doc}"));
        out.open(format!(
            "func (h *{name}) {handler}(w http.ResponseWriter, r *http.Request) {{"
        ));
        if handler == "Show" {
            out.line("id := router.Param(r, \"id\")");
            out.line("_ = id");
        }
        out.close();
    }

    out.finish()
}
