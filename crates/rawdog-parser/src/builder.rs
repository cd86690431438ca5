//! Build the structural model from a declaration tree.
//!
//! Records become entities, interfaces become method contracts, and methods
//! declared on `*Service` receivers are grouped into service method sets.
//! Slots that cannot be modeled are omitted with a warning, or reported as
//! errors when strict mode is on.

use std::collections::HashSet;

use rawdog_core::config::RawdogConfig;
use rawdog_core::error::ModelError;
use rawdog_core::model::{
    Entity, Field, FileModel, Interface, Method, Param, ServiceMethodSet, TypeKind,
};
use rawdog_core::{policy, tags};

use crate::declarations::{
    InterfaceDecl, MethodDecl, ParamDecl, Signature, SourceFile, StructDecl,
};
use crate::resolver::resolve;

/// Options controlling model population.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Namespace service method signatures are resolved in.
    pub service_namespace: String,
    /// Turn omissions into errors.
    pub strict: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            service_namespace: "domain".to_string(),
            strict: false,
        }
    }
}

impl BuildOptions {
    pub fn from_config(config: &RawdogConfig) -> Self {
        Self {
            service_namespace: config.naming.domain_package.clone(),
            strict: config.model.strict,
        }
    }
}

/// Build the full model for one parsed file.
pub fn build_model(file: &SourceFile, options: &BuildOptions) -> Result<FileModel, ModelError> {
    let struct_names: HashSet<&str> = file.structs().map(|s| s.name.as_str()).collect();

    let entities = file
        .structs()
        .map(|decl| build_entity(decl, &file.package, &struct_names, options))
        .collect::<Result<Vec<_>, _>>()?;

    let interfaces = file
        .interfaces()
        .map(|decl| build_interface(decl, &file.package, options))
        .collect::<Result<Vec<_>, _>>()?;

    let services = build_services(file.methods(), options)?;

    tracing::debug!(
        "package {}: {} entities, {} interfaces, {} service sets",
        file.package,
        entities.len(),
        interfaces.len(),
        services.len()
    );

    Ok(FileModel {
        namespace: file.package.clone(),
        entities,
        interfaces,
        services,
    })
}

/// Log an omission, or fail with it in strict mode.
fn omit(options: &BuildOptions, err: ModelError) -> Result<(), ModelError> {
    if options.strict {
        return Err(err);
    }
    tracing::warn!("omitting: {err}");
    Ok(())
}

/// Persisted columns of one record, up to the sentinel field.
///
/// Only bare value fields with a `db` column tag are columns; pointers,
/// sequences, qualified and embedded fields are bookkeeping and are skipped
/// without a diagnostic.
pub fn build_entity(
    decl: &StructDecl,
    namespace: &str,
    struct_names: &HashSet<&str>,
    options: &BuildOptions,
) -> Result<Entity, ModelError> {
    let mut fields = Vec::new();

    'scan: for field in &decl.fields {
        for name in &field.names {
            if name == policy::SENTINEL_FIELD {
                break 'scan;
            }
            let Some(signature) = resolve(&field.ty, namespace) else {
                omit(
                    options,
                    ModelError::UnsupportedFieldType {
                        record: decl.name.clone(),
                        field: name.clone(),
                        type_text: field.ty.to_string(),
                    },
                )?;
                continue;
            };
            if signature.kind != TypeKind::Value {
                continue;
            }
            let tag = field.tag.as_deref().unwrap_or_default();
            let Some(column) = tags::column(tag) else {
                omit(
                    options,
                    ModelError::MissingTag {
                        record: decl.name.clone(),
                        field: name.clone(),
                    },
                )?;
                continue;
            };
            fields.push(Field {
                name: name.clone(),
                signature,
                tag: tag.to_string(),
                column: column.to_string(),
            });
        }
    }

    let is_augmented = struct_names.contains(policy::augmented_name(&decl.name).as_str());
    Ok(Entity {
        name: decl.name.clone(),
        fields,
        is_augmented,
    })
}

pub fn build_interface(
    decl: &InterfaceDecl,
    namespace: &str,
    options: &BuildOptions,
) -> Result<Interface, ModelError> {
    let methods = decl
        .methods
        .iter()
        .map(|spec| build_method(&decl.name, &spec.name, &spec.signature, namespace, options))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Interface {
        name: decl.name.clone(),
        methods,
        namespace: namespace.to_string(),
    })
}

/// Group receiver methods by `*Service` receiver type, in order of first appearance.
pub fn build_services<'a>(
    methods: impl Iterator<Item = &'a MethodDecl>,
    options: &BuildOptions,
) -> Result<Vec<ServiceMethodSet>, ModelError> {
    let mut sets: Vec<ServiceMethodSet> = Vec::new();
    for decl in methods {
        let receiver = &decl.receiver.type_name;
        if policy::service_base(receiver).is_none() {
            continue;
        }
        let method = build_method(
            receiver,
            &decl.name,
            &decl.signature,
            &options.service_namespace,
            options,
        )?;
        match sets.iter_mut().find(|s| &s.receiver == receiver) {
            Some(set) => set.methods.push(method),
            None => sets.push(ServiceMethodSet {
                receiver: receiver.clone(),
                methods: vec![method],
            }),
        }
    }
    Ok(sets)
}

fn build_method(
    owner: &str,
    name: &str,
    signature: &Signature,
    namespace: &str,
    options: &BuildOptions,
) -> Result<Method, ModelError> {
    let mut params = Vec::new();
    for decl in &signature.params {
        expand_params(owner, name, decl, namespace, options, &mut params)?;
    }
    let mut returns = Vec::new();
    for decl in &signature.results {
        expand_params(owner, name, decl, namespace, options, &mut returns)?;
    }
    for ret in &mut returns {
        if ret.is_variadic() {
            tracing::warn!("{owner}.{name}: variadic return slot dropped");
            ret.signature = None;
        }
    }
    Ok(Method {
        name: name.to_string(),
        params,
        returns,
    })
}

/// One [`Param`] per declared name, all sharing the group's signature.
fn expand_params(
    owner: &str,
    method: &str,
    decl: &ParamDecl,
    namespace: &str,
    options: &BuildOptions,
    out: &mut Vec<Param>,
) -> Result<(), ModelError> {
    let signature = resolve(&decl.ty, namespace);
    if signature.is_none() {
        omit(
            options,
            ModelError::UnresolvedType {
                owner: owner.to_string(),
                method: method.to_string(),
                type_text: decl.ty.to_string(),
            },
        )?;
    }
    if decl.names.is_empty() {
        out.push(Param::new("", signature));
    } else {
        out.extend(
            decl.names
                .iter()
                .map(|n| Param::new(n.clone(), signature.clone())),
        );
    }
    Ok(())
}
