//! Test scaffolds mirroring the generated query methods one to one.

use rawdog_core::config::RawdogConfig;
use rawdog_core::error::ModelError;
use rawdog_core::model::{Entity, Field, FileModel, Relation, TypeKind};
use rawdog_core::relations::infer_relations;
use rawdog_core::{policy, zero_value};

use crate::text::{TextBuilder, article};

/// Naming inputs of the scaffold synthesizer.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub table: String,
    pub repo_package: String,
    pub repo_import: String,
    pub domain_package: String,
    pub domain_import: String,
    /// Shared connection fixture handed to the repo constructor.
    pub shared_db: String,
}

impl ScaffoldOptions {
    pub fn new(table: impl Into<String>, config: &RawdogConfig) -> Self {
        let naming = &config.naming;
        Self {
            table: table.into(),
            repo_package: naming.repo_package.clone(),
            repo_import: naming.repo_import.clone(),
            domain_package: naming.domain_package.clone(),
            domain_import: naming.domain_import.clone(),
            shared_db: naming.shared_db.clone(),
        }
    }
}

/// Scaffold for the primary entity of `model`.
pub fn synthesize_scaffold(
    model: &FileModel,
    options: &ScaffoldOptions,
) -> Result<String, ModelError> {
    let entity = model.primary_entity().ok_or(ModelError::NoEntity)?;
    let relations = infer_relations(entity, &options.table);
    Ok(synthesize_entity_scaffold(entity, &relations, options))
}

/// Literal assigned to a field in the `Store` block.
///
/// Integers get `1`, floats `1000.0`, strings `"test<Field>"` and booleans
/// `false`; anything else falls back to its zero value.
pub fn store_literal(field: &Field) -> String {
    let sig = &field.signature;
    if sig.kind != TypeKind::Value {
        return zero_value::zero_value(sig);
    }
    match sig.rendered.as_str() {
        "string" => format!("\"test{}\"", field.name),
        "bool" => "false".to_string(),
        name if policy::is_integer(name) => "1".to_string(),
        name if policy::is_float(name) => "1000.0".to_string(),
        _ => zero_value::zero_value(sig),
    }
}

pub fn synthesize_entity_scaffold(
    entity: &Entity,
    relations: &[Relation],
    options: &ScaffoldOptions,
) -> String {
    let name = &entity.name;
    let all = format!("all{name}");
    let all_aug = format!("all{}", entity.augmented_name());
    let probe = entity
        .probe_field()
        .map_or(policy::IDENTITY_FIELD, |f| f.name.as_str());
    let id = policy::IDENTITY_FIELD;

    let mut out = TextBuilder::new();
    header(&mut out, entity, options);

    out.line(format!("// Get all {name} records in the database."));
    out.line(format!("{all}, err := s.All()"));
    out.line("assert.NoError(t, err)");

    out.blank();
    out.line(format!("// Get first {name} record by ID."));
    out.line(format!("item0, err := s.ByID(fmt.Sprint({all}[0].{id}))"));
    out.line("assert.NoError(t, err)");
    out.line(format!("assert.Equal(t, {all}[0].{probe}, item0.{probe})"));

    if entity.is_augmented {
        out.blank();
        out.line(format!("// Get all augmented {name} records in the database."));
        out.line(format!("{all_aug}, err := s.AllAugmented()"));
        out.line("assert.NoError(t, err)");

        out.blank();
        out.line(format!("// Get first augmented {name} record by ID."));
        out.line(format!(
            "augItem0, err := s.ByIDAugmented(fmt.Sprint({all_aug}[0].{id}))"
        ));
        out.line("assert.NoError(t, err)");
        out.line(format!(
            "assert.Equal(t, {all_aug}[0].{probe}, augItem0.{probe})"
        ));
    }

    for relation in relations {
        let accessor = &relation.accessor_name;
        out.blank();
        out.line(format!("// Get {name} records by {accessor}."));
        out.line(format!(
            "itemsBy{accessor}, err := s.By{accessor}(fmt.Sprint({all}[0].{accessor}))"
        ));
        out.line("assert.NoError(t, err)");
        out.line(format!(
            "assert.Equal(t, {all}[0].{accessor}, itemsBy{accessor}[0].{accessor})"
        ));
        if entity.is_augmented {
            out.blank();
            out.line(format!("// Get augmented {name} records by {accessor}."));
            out.line(format!(
                "augItemsBy{accessor}, err := s.By{accessor}Augmented(fmt.Sprint({all_aug}[0].{accessor}))"
            ));
            out.line("assert.NoError(t, err)");
            out.line(format!(
                "assert.Equal(t, {all_aug}[0].{accessor}, augItemsBy{accessor}[0].{accessor})"
            ));
        }
    }

    out.blank();
    let a = article(name);
    out.line(format!("// Store {a} {name} record."));
    out.line(format!(
        "item := new({}.{name})",
        options.domain_package
    ));
    for field in entity.insertable_fields() {
        out.line(format!("item.{} = {}", field.name, store_literal(field)));
    }
    out.blank();
    out.line(format!("new{name}, err := s.Store(item)"));
    out.line("assert.NoError(t, err)");
    out.line(format!("assert.Equal(t, item.{probe}, new{name}.{probe})"));

    out.blank();
    out.line(format!("// Delete {a} {name} record by its ID."));
    out.line(format!("err = s.DeleteByID(fmt.Sprint(new{name}.{id}))"));
    out.line("assert.NoError(t, err)");

    out.close();
    out.finish()
}

fn header(out: &mut TextBuilder, entity: &Entity, options: &ScaffoldOptions) {
    let name = &entity.name;
    out.line(format!("package {}_test", options.repo_package));
    out.blank();
    out.open("import (");
    out.line("\"fmt\"");
    out.line("\"testing\"");
    out.blank();
    out.line(format!("\"{}\"", options.repo_import));
    out.line(format!("\"{}\"", options.domain_import));
    out.blank();
    out.line("\"github.com/stretchr/testify/assert\"");
    out.dedent().line(")");
    out.blank();
    out.line(format!("// Test{name}Repo exercises every generated {name} query."));
    out.open(format!("func Test{name}Repo(t *testing.T) {{"));
    out.line(format!(
        "s := {}.New{name}Repo({})",
        options.repo_package, options.shared_db
    ));
    out.blank();
}
