//! Extract top-level declarations from Go source.
//!
//! The result is a small declaration tree: records, interfaces, receiver
//! methods and free functions, each with their type expressions kept as a
//! closed [`TypeExpr`] enum. Everything else at the top level (imports,
//! constants, variables, aliases) is ignored.

use std::fmt;
use tree_sitter::Node;

use crate::error::ParseError;
use crate::treesitter::{first_named, parse_go, text};

/// A parsed declaration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: String,
    pub declarations: Vec<Declaration>,
}

impl SourceFile {
    pub fn structs(&self) -> impl Iterator<Item = &StructDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Struct(s) => Some(s),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Interface(i) => Some(i),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Method(m) => Some(m),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Struct(StructDecl),
    Interface(InterfaceDecl),
    Method(MethodDecl),
    Function(FunctionDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

/// One field line. `names` is empty for an embedded field and holds several
/// names for a grouped declaration (`A, B int`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// Tag contents without the surrounding quotes.
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    pub methods: Vec<MethodSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: String,
    pub signature: Signature,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<ParamDecl>,
    pub results: Vec<ParamDecl>,
}

/// One parameter group. `names` is empty for an unnamed slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub names: Vec<String>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub receiver: Receiver,
    pub name: String,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    pub name: Option<String>,
    pub type_name: String,
    pub pointer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub signature: Signature,
}

/// Closed grammar of type expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare identifier (`int`, `Widget`, `any`).
    Name(String),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `...T`, only produced for the last parameter of a list.
    Variadic(Box<TypeExpr>),
    /// The empty interface `interface{}`.
    Open,
    /// `pkg.Name`
    Qualified { package: Box<TypeExpr>, name: String },
    /// Maps, channels, funcs, arrays, generics, inline structs and
    /// non-empty inline interfaces.
    Unsupported { kind: String, text: String },
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => f.write_str(name),
            TypeExpr::Slice(inner) => write!(f, "[]{inner}"),
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Variadic(inner) => write!(f, "...{inner}"),
            TypeExpr::Open => f.write_str("interface{}"),
            TypeExpr::Qualified { package, name } => write!(f, "{package}.{name}"),
            TypeExpr::Unsupported { text, .. } => f.write_str(text),
        }
    }
}

/// Parse one Go file into its declaration tree.
pub fn parse_source(source: &str) -> Result<SourceFile, ParseError> {
    let tree = parse_go(source)?;
    let root = tree.root_node();

    let mut package = None;
    let mut declarations = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "package_clause" => {
                package = first_named(child).map(|n| text(n, source).to_string());
            }
            "type_declaration" => {
                let mut tc = child.walk();
                for spec in child.children(&mut tc) {
                    if spec.kind() == "type_spec"
                        && let Some(decl) = type_spec(spec, source)
                    {
                        declarations.push(decl);
                    }
                }
            }
            "method_declaration" => {
                if let Some(decl) = method_declaration(child, source) {
                    declarations.push(Declaration::Method(decl));
                }
            }
            "function_declaration" => {
                if let Some(name_node) = child.child_by_field_name("name") {
                    declarations.push(Declaration::Function(FunctionDecl {
                        name: text(name_node, source).to_string(),
                        signature: signature(child, source),
                    }));
                }
            }
            _ => {}
        }
    }

    let package = package.ok_or(ParseError::MissingPackage)?;
    Ok(SourceFile {
        package,
        declarations,
    })
}

fn type_spec(spec: Node<'_>, source: &str) -> Option<Declaration> {
    let name = text(spec.child_by_field_name("name")?, source).to_string();
    let ty = spec.child_by_field_name("type")?;
    match ty.kind() {
        "struct_type" => Some(Declaration::Struct(StructDecl {
            name,
            fields: struct_fields(ty, source),
        })),
        "interface_type" => Some(Declaration::Interface(InterfaceDecl {
            name,
            methods: interface_methods(ty, source),
        })),
        _ => None,
    }
}

fn struct_fields(struct_type: Node<'_>, source: &str) -> Vec<FieldDecl> {
    let mut fields = Vec::new();
    let Some(list) = first_named(struct_type) else {
        return fields;
    };
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(type_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let mut nc = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut nc)
            .map(|n| text(n, source).to_string())
            .collect();
        let mut ty = type_expr(type_node, source);
        // Embedded `*T` keeps the star outside the type field.
        if names.is_empty() && has_token(decl, "*") {
            ty = TypeExpr::Pointer(Box::new(ty));
        }
        let tag = decl
            .child_by_field_name("tag")
            .map(|t| unquote(text(t, source)));
        fields.push(FieldDecl { names, ty, tag });
    }
    fields
}

fn interface_methods(iface: Node<'_>, source: &str) -> Vec<MethodSpec> {
    let mut methods = Vec::new();
    collect_method_elems(iface, source, &mut methods);
    methods
}

fn collect_method_elems(node: Node<'_>, source: &str, methods: &mut Vec<MethodSpec>) {
    let mut cursor = node.walk();
    for elem in node.named_children(&mut cursor) {
        match elem.kind() {
            "method_elem" | "method_spec" => {
                if let Some(name_node) = elem.child_by_field_name("name") {
                    methods.push(MethodSpec {
                        name: text(name_node, source).to_string(),
                        signature: signature(elem, source),
                    });
                }
            }
            // Older grammars wrap the elements in a list node.
            "method_spec_list" => collect_method_elems(elem, source, methods),
            // Embedded interfaces and type constraints carry no methods of their own.
            _ => {}
        }
    }
}

fn method_declaration(node: Node<'_>, source: &str) -> Option<MethodDecl> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    let receiver = receiver(node.child_by_field_name("receiver")?, source)?;
    Some(MethodDecl {
        receiver,
        name,
        signature: signature(node, source),
    })
}

fn receiver(list: Node<'_>, source: &str) -> Option<Receiver> {
    let mut cursor = list.walk();
    let decl = list
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")?;
    let name = decl
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string());
    let ty = decl.child_by_field_name("type")?;
    let (pointer, target) = if ty.kind() == "pointer_type" {
        (true, first_named(ty)?)
    } else {
        (false, ty)
    };
    // Generic receivers (`*Repo[T]`) are not service candidates.
    if target.kind() != "type_identifier" {
        return None;
    }
    Some(Receiver {
        name,
        type_name: text(target, source).to_string(),
        pointer,
    })
}

/// Parameters and results of a function, method or interface method node.
fn signature(node: Node<'_>, source: &str) -> Signature {
    let params = node
        .child_by_field_name("parameters")
        .map(|list| parameter_list(list, source))
        .unwrap_or_default();
    let results = match node.child_by_field_name("result") {
        Some(result) if result.kind() == "parameter_list" => parameter_list(result, source),
        Some(result) => vec![ParamDecl {
            names: Vec::new(),
            ty: type_expr(result, source),
        }],
        None => Vec::new(),
    };
    Signature { params, results }
}

fn parameter_list(list: Node<'_>, source: &str) -> Vec<ParamDecl> {
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        let Some(type_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let mut nc = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut nc)
            .map(|n| text(n, source).to_string())
            .collect();
        let ty = match decl.kind() {
            "parameter_declaration" => type_expr(type_node, source),
            "variadic_parameter_declaration" => {
                TypeExpr::Variadic(Box::new(type_expr(type_node, source)))
            }
            _ => continue,
        };
        params.push(ParamDecl { names, ty });
    }
    params
}

/// Convert one type node into the closed [`TypeExpr`] grammar.
pub fn type_expr(node: Node<'_>, source: &str) -> TypeExpr {
    let unsupported = || TypeExpr::Unsupported {
        kind: node.kind().to_string(),
        text: text(node, source).to_string(),
    };
    match node.kind() {
        "type_identifier" | "identifier" | "package_identifier" => {
            TypeExpr::Name(text(node, source).to_string())
        }
        "pointer_type" => match first_named(node) {
            Some(inner) => TypeExpr::Pointer(Box::new(type_expr(inner, source))),
            None => unsupported(),
        },
        "slice_type" => match node.child_by_field_name("element") {
            Some(inner) => TypeExpr::Slice(Box::new(type_expr(inner, source))),
            None => unsupported(),
        },
        "qualified_type" => {
            match (
                node.child_by_field_name("package"),
                node.child_by_field_name("name"),
            ) {
                (Some(package), Some(name)) => TypeExpr::Qualified {
                    package: Box::new(type_expr(package, source)),
                    name: text(name, source).to_string(),
                },
                _ => unsupported(),
            }
        }
        "interface_type" => {
            if first_named(node).is_none() {
                TypeExpr::Open
            } else {
                unsupported()
            }
        }
        "parenthesized_type" => match first_named(node) {
            Some(inner) => type_expr(inner, source),
            None => unsupported(),
        },
        _ => unsupported(),
    }
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token)
}

/// Strip the delimiters of a raw or interpreted string literal.
fn unquote(literal: &str) -> String {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        return raw.to_string();
    }
    match literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => literal.to_string(),
    }
}
