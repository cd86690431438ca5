//! Foreign-key inference from column naming.
//!
//! A persisted column ending in `_id` names another entity: strip the owning
//! table's `<table>_` prefix and the suffix, and what remains is the joined
//! entity. Relations keep declared field order and are not deduplicated, so
//! two columns pointing at the same entity produce two joins.

use crate::model::{Entity, Field, Relation};
use crate::policy;

/// Relations implied by `entity`'s columns, in declared field order.
pub fn infer_relations(entity: &Entity, table: &str) -> Vec<Relation> {
    entity
        .fields
        .iter()
        .filter_map(|field| relation_for(field, table))
        .collect()
}

/// Joined entities named by more than one relation, in first-seen order.
///
/// Each repeat becomes an unaliased second `LEFT JOIN` of the same table.
pub fn repeated_joins(relations: &[Relation]) -> Vec<&str> {
    let mut repeated: Vec<&str> = Vec::new();
    for (i, relation) in relations.iter().enumerate() {
        let joined = relation.joined_entity_name.as_str();
        let seen_before = relations[..i]
            .iter()
            .any(|r| r.joined_entity_name == joined);
        if seen_before && !repeated.contains(&joined) {
            repeated.push(joined);
        }
    }
    repeated
}

fn relation_for(field: &Field, table: &str) -> Option<Relation> {
    if field.is_identity() {
        return None;
    }
    let joined = joined_entity_name(&field.column, table)?;
    Some(Relation {
        accessor_name: field.name.clone(),
        column_name: field.column.clone(),
        joined_entity_name: joined.to_string(),
    })
}

/// `order_customer_id` in table `order` → `customer`.
///
/// Returns `None` when the column does not carry the relation suffix or
/// names the table's own identity (`order_id`).
pub fn joined_entity_name<'a>(column: &'a str, table: &str) -> Option<&'a str> {
    let stem = column.strip_suffix(policy::RELATION_SUFFIX)?;
    let joined = strip_table_prefix(stem, table);
    if joined.is_empty() || joined == table {
        None
    } else {
        Some(joined)
    }
}

/// Drop a leading `<table>_` from a column name, if present.
pub fn strip_table_prefix<'a>(column: &'a str, table: &str) -> &'a str {
    column
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(column)
}
