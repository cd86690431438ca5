//! Structural model shared by the parser and every synthesizer.
//!
//! All values are built once per input file and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::policy;

/// Classification of a declared type occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Value,
    Pointer,
    Sequence,
    Variadic,
    OpenType,
    QualifiedValue,
}

impl TypeKind {
    /// Sigil prepended to the inner rendering for wrapper kinds.
    pub fn sigil(self) -> Option<&'static str> {
        match self {
            TypeKind::Pointer => Some("*"),
            TypeKind::Sequence => Some("[]"),
            TypeKind::Variadic => Some("..."),
            TypeKind::Value | TypeKind::OpenType | TypeKind::QualifiedValue => None,
        }
    }
}

/// Canonical description of one declared type occurrence.
///
/// Wrapper kinds (pointer, sequence, variadic) keep the signature they wrap,
/// and `rendered` is always the sigil followed by the inner rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSignature {
    pub kind: TypeKind,
    pub rendered: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<TypeSignature>>,
}

impl TypeSignature {
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Value,
            rendered: name.into(),
            inner: None,
        }
    }

    pub fn open(token: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::OpenType,
            rendered: token.into(),
            inner: None,
        }
    }

    /// `ns.Name` where `ns` is an already resolved selector prefix.
    pub fn qualified(prefix: &TypeSignature, name: &str) -> Self {
        Self {
            kind: TypeKind::QualifiedValue,
            rendered: format!("{}.{}", prefix.rendered, name),
            inner: None,
        }
    }

    /// Wrap `inner` in a pointer, sequence or variadic layer.
    ///
    /// Non-wrapper kinds return `inner` unchanged.
    pub fn wrap(kind: TypeKind, inner: TypeSignature) -> Self {
        match kind.sigil() {
            Some(sigil) => Self {
                kind,
                rendered: format!("{sigil}{}", inner.rendered),
                inner: Some(Box::new(inner)),
            },
            None => inner,
        }
    }

    pub fn pointer(inner: TypeSignature) -> Self {
        Self::wrap(TypeKind::Pointer, inner)
    }

    pub fn sequence(inner: TypeSignature) -> Self {
        Self::wrap(TypeKind::Sequence, inner)
    }

    pub fn variadic(inner: TypeSignature) -> Self {
        Self::wrap(TypeKind::Variadic, inner)
    }

    /// The innermost non-wrapper signature.
    pub fn innermost(&self) -> &TypeSignature {
        let mut current = self;
        while let Some(inner) = &current.inner {
            current = inner;
        }
        current
    }

    /// Nesting depth of wrapper layers (0 for a bare type).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(inner) = &current.inner {
            depth += 1;
            current = inner;
        }
        depth
    }

    pub fn is_bare_value(&self) -> bool {
        self.kind == TypeKind::Value
    }
}

/// A parameter or return slot. `name` is empty for unnamed slots and
/// `signature` is absent when the declared type could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub signature: Option<TypeSignature>,
}

impl Param {
    pub fn new(name: impl Into<String>, signature: Option<TypeSignature>) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }

    /// Rendered type, or the empty string for an unresolved slot.
    pub fn rendered_type(&self) -> &str {
        self.signature.as_ref().map_or("", |s| s.rendered.as_str())
    }

    pub fn kind(&self) -> Option<TypeKind> {
        self.signature.as_ref().map(|s| s.kind)
    }

    pub fn is_variadic(&self) -> bool {
        self.kind() == Some(TypeKind::Variadic)
    }
}

/// A method signature, from an interface or a receiver declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Vec<Param>,
}

/// A persisted column of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub signature: TypeSignature,
    /// Raw struct tag text, without the surrounding quotes.
    pub tag: String,
    /// Column name taken from the tag.
    pub column: String,
}

impl Field {
    pub fn is_identity(&self) -> bool {
        self.name == policy::IDENTITY_FIELD
    }

    pub fn type_name(&self) -> &str {
        &self.signature.rendered
    }
}

/// A persisted record and its columns in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
    /// A sibling `<Name>Augmented` declaration exists in the same file.
    pub is_augmented: bool,
}

impl Entity {
    pub fn augmented_name(&self) -> String {
        policy::augmented_name(&self.name)
    }

    pub fn identity(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_identity())
    }

    /// Fields written by an insert: everything except the identity.
    pub fn insertable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_identity())
    }

    /// The field compared against a baseline row in generated tests:
    /// the first non-identity field, falling back to the identity.
    pub fn probe_field(&self) -> Option<&Field> {
        self.insertable_fields()
            .next()
            .or_else(|| self.fields.first())
    }

    pub fn is_augmented_sibling(&self) -> bool {
        self.name.ends_with(policy::AUGMENTED_SUFFIX)
    }
}

/// An interface contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub methods: Vec<Method>,
    pub namespace: String,
}

/// Methods declared on one `*Service` receiver type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMethodSet {
    pub receiver: String,
    pub methods: Vec<Method>,
}

impl ServiceMethodSet {
    /// Receiver type name without the service suffix.
    pub fn base_name(&self) -> &str {
        policy::service_base(&self.receiver).unwrap_or(&self.receiver)
    }
}

/// An inferred reference from one entity's column to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Declared field name, used in `By<Accessor>` method names.
    pub accessor_name: String,
    pub column_name: String,
    pub joined_entity_name: String,
}

/// Everything extracted from one declaration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModel {
    pub namespace: String,
    pub entities: Vec<Entity>,
    pub interfaces: Vec<Interface>,
    pub services: Vec<ServiceMethodSet>,
}

impl FileModel {
    /// The first entity that is not itself an augmented sibling.
    pub fn primary_entity(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| !e.is_augmented_sibling())
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: &str, column: &str) -> Field {
        Field {
            name: name.to_string(),
            signature: TypeSignature::value(ty),
            tag: format!("db:\"{column}\""),
            column: column.to_string(),
        }
    }

    #[test]
    fn test_wrap_renders_sigils_outside_in() {
        let widget = TypeSignature::qualified(&TypeSignature::value("pkg"), "Widget");
        let sig = TypeSignature::pointer(TypeSignature::sequence(widget));
        assert_eq!(sig.rendered, "*[]pkg.Widget");
        assert_eq!(sig.kind, TypeKind::Pointer);
        assert_eq!(sig.depth(), 2);
        assert_eq!(sig.innermost().kind, TypeKind::QualifiedValue);
    }

    #[test]
    fn test_wrap_ignores_non_wrapper_kind() {
        let sig = TypeSignature::wrap(TypeKind::Value, TypeSignature::value("int"));
        assert_eq!(sig, TypeSignature::value("int"));
    }

    #[test]
    fn test_unresolved_param_renders_empty() {
        let p = Param::new("m", None);
        assert_eq!(p.rendered_type(), "");
        assert!(p.kind().is_none());
    }

    #[test]
    fn test_probe_field_skips_identity() {
        let entity = Entity {
            name: "Account".to_string(),
            fields: vec![
                field("ID", "int", "account_id"),
                field("Name", "string", "account_name"),
            ],
            is_augmented: false,
        };
        assert_eq!(entity.identity().map(|f| f.column.as_str()), Some("account_id"));
        assert_eq!(entity.probe_field().map(|f| f.name.as_str()), Some("Name"));
        assert_eq!(entity.insertable_fields().count(), 1);
    }

    #[test]
    fn test_primary_entity_skips_augmented_sibling() {
        let model = FileModel {
            namespace: "domain".to_string(),
            entities: vec![
                Entity {
                    name: "AccountAugmented".to_string(),
                    fields: Vec::new(),
                    is_augmented: false,
                },
                Entity {
                    name: "Account".to_string(),
                    fields: Vec::new(),
                    is_augmented: true,
                },
            ],
            ..FileModel::default()
        };
        assert_eq!(model.primary_entity().map(|e| e.name.as_str()), Some("Account"));
    }

    #[test]
    fn test_service_base_name() {
        let set = ServiceMethodSet {
            receiver: "AccountService".to_string(),
            methods: Vec::new(),
        };
        assert_eq!(set.base_name(), "Account");
    }
}
