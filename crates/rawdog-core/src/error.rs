//! Model population errors.

/// Errors raised while turning declarations into the structural model, or
/// when a synthesizer's required input is missing from the model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("field {record}.{field} has no `db` column tag")]
    MissingTag { record: String, field: String },
    #[error("field {record}.{field} has unsupported type `{type_text}`")]
    UnsupportedFieldType {
        record: String,
        field: String,
        type_text: String,
    },
    #[error("{owner}.{method}: cannot resolve type `{type_text}`")]
    UnresolvedType {
        owner: String,
        method: String,
        type_text: String,
    },
    #[error("{entity} joins `{joined}` more than once")]
    DuplicateJoin { entity: String, joined: String },
    #[error("no persisted record declaration found")]
    NoEntity,
    #[error("no methods declared on a *{suffix} receiver", suffix = crate::policy::SERVICE_SUFFIX)]
    NoService,
}
