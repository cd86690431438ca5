//! CRUD repository methods with fixed, placeholder-bound SQL templates.
//!
//! Every statement is a literal template; caller values only ever reach the
//! database through `?` placeholders.

use rawdog_core::config::RawdogConfig;
use rawdog_core::error::ModelError;
use rawdog_core::model::{Entity, Field, FileModel, Relation};
use rawdog_core::relations::{infer_relations, repeated_joins, strip_table_prefix};
use rawdog_core::policy;

use crate::text::{TextBuilder, article};

/// First line of every query file.
pub const QUERIES_HEADER: &str =
    "// Generated by Rawdog. The following methods belong after toEntity[Augmented].";

/// Per-file inputs of the query synthesizer.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Table name, normally the declaration file's base name.
    pub table: String,
    /// Package qualifying the entity's external representation.
    pub domain_package: String,
    /// Drop the `<table>_` prefix from column names in statements.
    pub strip_table_prefix: bool,
    /// Reject entities that join the same table twice.
    pub strict: bool,
}

impl QueryOptions {
    pub fn new(table: impl Into<String>, config: &RawdogConfig) -> Self {
        Self {
            table: table.into(),
            domain_package: config.naming.domain_package.clone(),
            strip_table_prefix: config.model.strip_table_prefix,
            strict: config.model.strict,
        }
    }

    /// Column name as written in statements.
    pub fn column<'a>(&self, column: &'a str) -> &'a str {
        if self.strip_table_prefix {
            strip_table_prefix(column, &self.table)
        } else {
            column
        }
    }
}

/// Queries for the primary entity of `model`.
pub fn synthesize_queries(model: &FileModel, options: &QueryOptions) -> Result<String, ModelError> {
    let entity = model.primary_entity().ok_or(ModelError::NoEntity)?;
    let relations = infer_relations(entity, &options.table);
    for joined in repeated_joins(&relations) {
        if options.strict {
            return Err(ModelError::DuplicateJoin {
                entity: entity.name.clone(),
                joined: joined.to_string(),
            });
        }
        tracing::warn!("{}: `{joined}` is joined more than once", entity.name);
    }
    tracing::debug!(
        "{}: {} columns, {} relations",
        entity.name,
        entity.fields.len(),
        relations.len()
    );
    Ok(synthesize_entity_queries(entity, &relations, options))
}

/// Every query method for one entity, in a fixed order.
pub fn synthesize_entity_queries(
    entity: &Entity,
    relations: &[Relation],
    options: &QueryOptions,
) -> String {
    let q = QueryContext::new(entity, relations, options);
    let mut blocks = vec![q.all(), q.by_id()];
    if entity.is_augmented {
        blocks.push(q.all_augmented());
        blocks.push(q.by_id_augmented());
    }
    for relation in relations {
        blocks.push(q.by_relation(relation));
        if entity.is_augmented {
            blocks.push(q.by_relation_augmented(relation));
        }
    }
    blocks.push(q.store());
    blocks.push(q.delete_by_id());

    let mut out = TextBuilder::new();
    out.line(QUERIES_HEADER);
    for block in &blocks {
        out.blank().raw(block);
    }
    out.finish()
}

struct Join<'a> {
    table: &'a str,
    column: &'a str,
}

struct QueryContext<'a> {
    entity: &'a Entity,
    options: &'a QueryOptions,
    table: &'a str,
    repo: String,
    external: String,
    external_augmented: String,
    identity_column: &'a str,
    joins: Vec<Join<'a>>,
}

impl<'a> QueryContext<'a> {
    fn new(entity: &'a Entity, relations: &'a [Relation], options: &'a QueryOptions) -> Self {
        let identity_column = entity
            .identity()
            .map_or(policy::IDENTITY_COLUMN, |f| options.column(&f.column));
        let joins = relations
            .iter()
            .map(|r| Join {
                table: &r.joined_entity_name,
                column: options.column(&r.column_name),
            })
            .collect();
        Self {
            entity,
            options,
            table: &options.table,
            repo: policy::repo_name(&entity.name),
            external: format!("{}.{}", options.domain_package, entity.name),
            external_augmented: format!(
                "{}.{}",
                options.domain_package,
                entity.augmented_name()
            ),
            identity_column,
            joins,
        }
    }

    fn select_list(&self) -> String {
        let mut list = format!("{}.*", self.table);
        for join in &self.joins {
            list.push_str(&format!(", {}.*", join.table));
        }
        list
    }

    /// SELECT ... FROM ... with every join, indented for a statement body.
    fn augmented_from(&self, out: &mut TextBuilder) {
        out.line(format!("SELECT {}", self.select_list()));
        out.line(format!("FROM {}", self.table));
        for join in &self.joins {
            out.line(format!("LEFT JOIN {}", join.table));
            out.indent();
            out.line(format!(
                "ON {}.{} = {}.{}",
                self.table,
                join.column,
                join.table,
                policy::IDENTITY_COLUMN
            ));
            out.line(format!(
                "AND {}.{} IS NULL",
                join.table,
                policy::DELETED_AT_COLUMN
            ));
            out.dedent();
        }
    }

    /// Opening of a `Select` into a local slice of db records.
    fn select_many(&self, out: &mut TextBuilder, record: &str) {
        out.line(format!("db{}Records := []{record}{{}}", self.entity.name));
        out.line(format!(
            "err := s.db.Connection().Select(&db{}Records, `",
            self.entity.name
        ));
        out.indent();
    }

    /// Statement close, error check and conversion loop of a multi-row read.
    fn collect_many(&self, out: &mut TextBuilder, args: &str, external: &str, convert: &str) {
        out.line("`".to_string() + args + ")");
        out.dedent();
        out.open("if err != nil {").line("return nil, err").close();
        out.blank();
        out.line(format!("result := []{external}{{}}"));
        out.open(format!("for _, record := range db{}Records {{", self.entity.name));
        out.line(format!("result = append(result, *record.{convert}())"));
        out.close();
        out.blank();
        out.line("return result, nil");
        out.close();
    }

    fn all(&self) -> String {
        let name = &self.entity.name;
        let mut out = TextBuilder::new();
        out.line(format!("// All will retrieve all {name} records in the database."));
        out.open(format!(
            "func (s *{}) All() ([]{}, error) {{",
            self.repo, self.external
        ));
        self.select_many(&mut out, name);
        out.indent();
        out.line(format!("SELECT {}.*", self.table));
        out.line(format!("FROM {}", self.table));
        out.line(format!("WHERE {} IS NULL", policy::DELETED_AT_COLUMN));
        out.dedent();
        self.collect_many(&mut out, "", &self.external, "toEntity");
        out.finish()
    }

    fn by_id(&self) -> String {
        let name = &self.entity.name;
        let mut out = TextBuilder::new();
        out.line(format!(
            "// ByID will retrieve the {name} record with the input ID."
        ));
        out.open(format!(
            "func (s *{}) ByID(id string) (*{}, error) {{",
            self.repo, self.external
        ));
        out.line(format!("result := {name}{{}}"));
        out.line("err := s.db.Connection().Get(&result, `");
        out.indent().indent();
        out.line(format!("SELECT {}.*", self.table));
        out.line(format!("FROM {}", self.table));
        out.line(format!("WHERE {} = ?", self.identity_column));
        out.indent();
        out.line(format!("AND {} IS NULL", policy::DELETED_AT_COLUMN));
        out.dedent();
        out.line("LIMIT 1");
        out.dedent();
        out.line("`, id)");
        out.dedent();
        out.line("return result.toEntity(), err");
        out.close();
        out.finish()
    }

    fn all_augmented(&self) -> String {
        let name = self.entity.augmented_name();
        let mut out = TextBuilder::new();
        out.line(format!(
            "// AllAugmented will retrieve all {name} records in the database."
        ));
        out.open(format!(
            "func (s *{}) AllAugmented() ([]{}, error) {{",
            self.repo, self.external_augmented
        ));
        self.select_many(&mut out, &name);
        out.indent();
        self.augmented_from(&mut out);
        out.line(format!(
            "WHERE {}.{} IS NULL",
            self.table,
            policy::DELETED_AT_COLUMN
        ));
        out.dedent();
        self.collect_many(&mut out, "", &self.external_augmented, "toEntityAugmented");
        out.finish()
    }

    fn by_id_augmented(&self) -> String {
        let name = self.entity.augmented_name();
        let mut out = TextBuilder::new();
        out.line(format!(
            "// ByIDAugmented will retrieve the {name} record with the input ID."
        ));
        out.open(format!(
            "func (s *{}) ByIDAugmented(id string) (*{}, error) {{",
            self.repo, self.external_augmented
        ));
        out.line(format!("result := {name}{{}}"));
        out.line("err := s.db.Connection().Get(&result, `");
        out.indent().indent();
        self.augmented_from(&mut out);
        out.line(format!("WHERE {}.{} = ?", self.table, self.identity_column));
        out.indent();
        out.line(format!(
            "AND {}.{} IS NULL",
            self.table,
            policy::DELETED_AT_COLUMN
        ));
        out.dedent();
        out.line("LIMIT 1");
        out.dedent();
        out.line("`, id)");
        out.dedent();
        out.line("return result.toEntityAugmented(), err");
        out.close();
        out.finish()
    }

    fn by_relation(&self, relation: &Relation) -> String {
        let name = &self.entity.name;
        let column = self.options.column(&relation.column_name);
        let mut out = TextBuilder::new();
        out.line(format!(
            "// By{} will retrieve all {name} records in the database with a given {column}.",
            relation.accessor_name
        ));
        out.open(format!(
            "func (s *{}) By{}({column} string) ([]{}, error) {{",
            self.repo, relation.accessor_name, self.external
        ));
        self.select_many(&mut out, name);
        out.indent();
        out.line(format!("SELECT {}.*", self.table));
        out.line(format!("FROM {}", self.table));
        self.relation_filter(&mut out, column);
        out.dedent();
        self.collect_many(&mut out, &format!(", {column}"), &self.external, "toEntity");
        out.finish()
    }

    fn by_relation_augmented(&self, relation: &Relation) -> String {
        let name = self.entity.augmented_name();
        let column = self.options.column(&relation.column_name);
        let mut out = TextBuilder::new();
        let accessor = &relation.accessor_name;
        let subject = format!("By{accessor}Augmented will retrieve all {name} records");
        out.line(format!("// {subject} in the database with a given {column}."));
        out.open(format!(
            "func (s *{}) By{}Augmented({column} string) ([]{}, error) {{",
            self.repo, relation.accessor_name, self.external_augmented
        ));
        self.select_many(&mut out, &name);
        out.indent();
        self.augmented_from(&mut out);
        self.relation_filter(&mut out, column);
        out.dedent();
        self.collect_many(
            &mut out,
            &format!(", {column}"),
            &self.external_augmented,
            "toEntityAugmented",
        );
        out.finish()
    }

    fn relation_filter(&self, out: &mut TextBuilder, column: &str) {
        out.line(format!(
            "WHERE {}.{} IS NULL",
            self.table,
            policy::DELETED_AT_COLUMN
        ));
        out.indent();
        out.line(format!("AND {}.{column} = ?", self.table));
        out.dedent();
    }

    fn store(&self) -> String {
        let name = &self.entity.name;
        let fields: Vec<&Field> = self.entity.insertable_fields().collect();
        let columns: Vec<&str> = fields.iter().map(|f| self.options.column(&f.column)).collect();
        let placeholders = vec!["?"; fields.len()].join(", ");
        let mut args = String::new();
        for field in &fields {
            args.push_str(&format!(", item.{}", field.name));
        }
        let identity = self.entity.identity();

        let mut out = TextBuilder::new();
        out.line(format!(
            "// Store will store {} {name} record in the database.",
            article(name)
        ));
        out.open(format!(
            "func (s *{}) Store(item *{ext}) (*{ext}, error) {{",
            self.repo,
            ext = self.external
        ));
        let result = if identity.is_some() { "res" } else { "_" };
        out.line(format!("{result}, err := s.db.Connection().Exec(`"));
        out.indent().indent();
        out.line(format!("INSERT INTO {}", self.table));
        out.line(format!("({})", columns.join(", ")));
        out.line("VALUES");
        out.line(format!("({placeholders})"));
        out.dedent();
        out.line(format!("`{args})"));
        out.dedent();
        out.open("if err != nil {").line("return nil, err").close();
        out.blank();
        if let Some(identity) = identity {
            out.line("id, err := res.LastInsertId()");
            out.open("if err != nil {").line("return nil, err").close();
            out.blank();
            out.line("itemCopy := *item");
            out.line(format!(
                "itemCopy.{} = {}(id)",
                policy::IDENTITY_FIELD,
                identity.type_name()
            ));
        } else {
            out.line("itemCopy := *item");
        }
        out.blank();
        out.line("return &itemCopy, nil");
        out.close();
        out.finish()
    }

    fn delete_by_id(&self) -> String {
        let name = &self.entity.name;
        let mut out = TextBuilder::new();
        out.line(format!(
            "// DeleteByID marks the {name} record with the specified ID as deleted."
        ));
        out.open(format!(
            "func (s *{}) DeleteByID(id string) error {{",
            self.repo
        ));
        out.line("_, err := s.db.Connection().Exec(`");
        out.indent().indent();
        out.line(format!("UPDATE {}", self.table));
        out.line(format!("SET {} = NOW()", policy::DELETED_AT_COLUMN));
        out.line(format!("WHERE {} = ?", self.identity_column));
        out.indent();
        out.line(format!("AND {} IS NULL", policy::DELETED_AT_COLUMN));
        out.dedent();
        out.line("LIMIT 1");
        out.dedent();
        out.line("`, id)");
        out.dedent();
        out.line("return err");
        out.close();
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawdog_core::model::TypeSignature;

    fn field(name: &str, ty: &str, column: &str) -> Field {
        Field {
            name: name.to_string(),
            signature: TypeSignature::value(ty),
            tag: format!("db:\"{column}\""),
            column: column.to_string(),
        }
    }

    fn options(table: &str) -> QueryOptions {
        QueryOptions {
            table: table.to_string(),
            domain_package: "domain".to_string(),
            strip_table_prefix: false,
            strict: false,
        }
    }

    fn widget() -> Entity {
        Entity {
            name: "Widget".to_string(),
            fields: vec![
                field("ID", "int64", "widget_id"),
                field("Label", "string", "widget_label"),
                field("Owner_id", "int", "widget_owner_id"),
            ],
            is_augmented: false,
        }
    }

    #[test]
    fn test_all_is_deterministic_with_single_predicate() {
        let entity = widget();
        let opts = options("widget");
        let q = QueryContext::new(&entity, &[], &opts);
        let first = q.all();
        assert_eq!(first, q.all());
        assert_eq!(first.matches("WHERE").count(), 1);
        assert!(first.contains("WHERE deleted_at IS NULL\n"));
        assert!(!first.contains(" AND "));
        assert!(first.contains("FROM widget\n"));
    }

    #[test]
    fn test_store_binds_non_identity_columns() {
        let entity = widget();
        let opts = options("widget");
        let q = QueryContext::new(&entity, &[], &opts);
        let store = q.store();
        assert!(store.contains("(widget_label, widget_owner_id)\n"));
        assert!(store.contains("(?, ?)\n"));
        assert!(store.contains("`, item.Label, item.Owner_id)"));
        assert!(store.contains("itemCopy.ID = int64(id)"));
    }

    #[test]
    fn test_store_without_identity_skips_last_insert_id() {
        let entity = Entity {
            name: "Tag".to_string(),
            fields: vec![field("Name", "string", "tag_name")],
            is_augmented: false,
        };
        let store = QueryContext::new(&entity, &[], &options("tag")).store();
        assert!(store.contains("_, err := s.db.Connection().Exec(`"));
        assert!(!store.contains("LastInsertId"));
    }

    #[test]
    fn test_identity_column_drives_lookups() {
        let entity = widget();
        let opts = options("widget");
        let q = QueryContext::new(&entity, &[], &opts);
        assert!(q.by_id().contains("WHERE widget_id = ?\n"));
        assert!(q.delete_by_id().contains("SET deleted_at = NOW()\n"));
        assert!(q.delete_by_id().contains("WHERE widget_id = ?\n"));

        let mut stripped = options("widget");
        stripped.strip_table_prefix = true;
        let q = QueryContext::new(&entity, &[], &stripped);
        assert!(q.by_id().contains("WHERE id = ?\n"));
    }

    #[test]
    fn test_relations_add_lookup_and_joins() {
        let mut entity = widget();
        entity.is_augmented = true;
        let relations = infer_relations(&entity, "widget");
        let text = synthesize_entity_queries(&entity, &relations, &options("widget"));
        assert!(text.contains(
            "func (s *WidgetRepo) ByOwner_id(widget_owner_id string) ([]domain.Widget, error) {"
        ));
        assert!(text.contains("AND widget.widget_owner_id = ?\n"));
        assert!(text.contains("SELECT widget.*, owner.*\n"));
        assert!(text.contains(
            "LEFT JOIN owner\n\t\t\t\tON widget.widget_owner_id = owner.id\n\t\t\t\tAND owner.deleted_at IS NULL\n"
        ));
        assert!(text.contains("func (s *WidgetRepo) ByOwner_idAugmented("));
    }

    #[test]
    fn test_method_order() {
        let mut entity = widget();
        entity.is_augmented = true;
        let relations = infer_relations(&entity, "widget");
        let text = synthesize_entity_queries(&entity, &relations, &options("widget"));
        let order = [
            ") All()",
            ") ByID(",
            ") AllAugmented()",
            ") ByIDAugmented(",
            ") ByOwner_id(",
            ") ByOwner_idAugmented(",
            ") Store(",
            ") DeleteByID(",
        ];
        let positions: Vec<usize> = order.iter().map(|m| text.find(m).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_missing_entity_is_an_error() {
        let err = synthesize_queries(&FileModel::default(), &options("x")).unwrap_err();
        assert!(matches!(err, ModelError::NoEntity));
    }
}
