mod pairing;
mod rename;

pub use pairing::equivalent_properties;
pub use rename::TEMP_NAME_PREFIX;

use pairing::{EntityPair, PropertyMap, pair_entity_types};
use rename::resolve_transitive_renames;

use crate::cancel::CancellationToken;
use crate::factory::OperationFactory;
use crate::model::{ForeignKey, SchemaModel, SchemaQualifiedName, Sequence};
use crate::names;
use crate::operations::{ColumnModel, MigrationOperation, MigrationOperationCollection};
use crate::type_mapper::TypeMapper;

/// Minimum property-set overlap for two differently-named entity types to
/// be treated as the same table under a rename.
pub const DEFAULT_FUZZY_MATCH_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub fuzzy_match_threshold: f64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            fuzzy_match_threshold: DEFAULT_FUZZY_MATCH_THRESHOLD,
        }
    }
}

/// Compares two schema models and emits the migration operations whose
/// sequential application evolves the source schema into the target one.
#[derive(Debug)]
pub struct ModelDiffer<'a> {
    factory: OperationFactory<'a>,
    options: DiffOptions,
}

impl<'a> ModelDiffer<'a> {
    #[must_use]
    pub fn new(type_mapper: &'a dyn TypeMapper) -> Self {
        Self::with_options(type_mapper, DiffOptions::default())
    }

    #[must_use]
    pub fn with_options(type_mapper: &'a dyn TypeMapper, options: DiffOptions) -> Self {
        Self {
            factory: OperationFactory::new(type_mapper),
            options,
        }
    }

    /// Diffing never fails: constructs the differ does not understand
    /// produce no operation. Unsupported combinations are rejected later by
    /// the pre-processor or generator.
    #[must_use]
    pub fn diff(&self, source: &SchemaModel, target: &SchemaModel) -> Vec<MigrationOperation> {
        self.diff_with_cancellation(source, target, &CancellationToken::new())
    }

    /// Like [`diff`](Self::diff), but stops emitting at the next
    /// operation-collection boundary once `cancel` is set, returning what
    /// has been produced so far.
    #[must_use]
    pub fn diff_with_cancellation(
        &self,
        source: &SchemaModel,
        target: &SchemaModel,
        cancel: &CancellationToken,
    ) -> Vec<MigrationOperation> {
        let mut operations = MigrationOperationCollection::new();
        if cancel.is_cancelled() {
            return operations.into_ordered();
        }

        let pairs = pair_entity_types(source, target, self.options.fuzzy_match_threshold);
        let property_map = PropertyMap::from_pairs(&pairs);
        tracing::debug!(
            paired = pairs.paired.len(),
            created = pairs.created.len(),
            dropped = pairs.dropped.len(),
            "paired entity types"
        );

        self.diff_sequences(source, target, &mut operations);

        if !cancel.is_cancelled() {
            for pair in &pairs.paired {
                self.diff_table_names(pair, &mut operations);
            }
            for &entity in &pairs.created {
                operations.add(MigrationOperation::CreateTable(
                    self.factory.create_table(target, entity),
                ));
                for index in &entity.indexes {
                    operations.add(MigrationOperation::CreateIndex(
                        self.factory.index_definition(entity, index),
                    ));
                }
            }
            for &entity in &pairs.dropped {
                operations.add(self.factory.drop_table(entity));
            }
        }

        for pair in &pairs.paired {
            if cancel.is_cancelled() {
                break;
            }
            self.diff_table_pair(source, target, pair, &property_map, &mut operations);
        }

        resolve_transitive_renames(&mut operations);
        operations.into_ordered()
    }

    /// Sequences pair on exact `(name, schema)` equality; there is no fuzzy
    /// matching for them.
    fn diff_sequences(
        &self,
        source: &SchemaModel,
        target: &SchemaModel,
        operations: &mut MigrationOperationCollection,
    ) {
        for target_sequence in &target.sequences {
            match find_sequence(source, target_sequence) {
                Some(source_sequence) => {
                    if source_sequence.increment != target_sequence.increment {
                        operations.add(
                            self.factory
                                .alter_sequence(target_sequence, target_sequence.increment),
                        );
                    }
                }
                None => operations.add(self.factory.create_sequence(target_sequence)),
            }
        }

        for source_sequence in &source.sequences {
            if find_sequence(target, source_sequence).is_none() {
                operations.add(self.factory.drop_sequence(source_sequence));
            }
        }
    }

    fn diff_table_names(
        &self,
        pair: &EntityPair<'_>,
        operations: &mut MigrationOperationCollection,
    ) {
        let source_name = names::full_table_name(pair.source);
        let target_name = names::full_table_name(pair.target);
        if source_name == target_name {
            return;
        }

        let mut current = source_name;
        if target_name.schema != current.schema
            && let Some(new_schema) = &target_name.schema
        {
            operations.add(self.factory.move_table(current.clone(), new_schema.clone()));
            current = current.with_schema(new_schema.clone());
        }
        if target_name.name != current.name {
            operations.add(self.factory.rename_table(current, target_name.name.clone()));
        }
    }

    fn diff_table_pair(
        &self,
        source: &SchemaModel,
        target: &SchemaModel,
        pair: &EntityPair<'_>,
        property_map: &PropertyMap,
        operations: &mut MigrationOperationCollection,
    ) {
        let table = names::full_table_name(pair.target);

        self.diff_columns(pair, &table, operations);
        self.diff_primary_keys(pair, property_map, &table, operations);
        self.diff_unique_constraints(pair, property_map, &table, operations);
        self.diff_foreign_keys(source, target, pair, property_map, &table, operations);
        self.diff_indexes(pair, property_map, &table, operations);
    }

    fn diff_columns(
        &self,
        pair: &EntityPair<'_>,
        table: &SchemaQualifiedName,
        operations: &mut MigrationOperationCollection,
    ) {
        for &(source_property, target_property) in &pair.properties {
            let source_column = self.factory.column_model(pair.source, source_property);
            let target_column = self.factory.column_model(pair.target, target_property);

            if source_column.name != target_column.name {
                operations.add(self.factory.rename_column(
                    table.clone(),
                    source_column.name.clone(),
                    target_column.name.clone(),
                ));
            }

            if columns_equivalent(&source_column, &target_column) {
                continue;
            }

            let default_changed = source_column.default_value != target_column.default_value
                || source_column.default_sql != target_column.default_sql;

            if default_changed && has_default(&source_column) {
                operations.add(
                    self.factory
                        .drop_default_constraint(table.clone(), target_column.name.clone()),
                );
            }
            if !columns_equivalent_ignoring_defaults(&source_column, &target_column) {
                operations.add(self.factory.alter_column(pair.target, target_property));
            }
            if default_changed && has_default(&target_column) {
                operations.add(self.factory.add_default_constraint(
                    table.clone(),
                    target_column.name.clone(),
                    target_column.default_value.clone(),
                    target_column.default_sql.clone(),
                ));
            }
        }

        for &property in &pair.target_only {
            operations.add(self.factory.add_column(pair.target, property));
        }

        for &property in &pair.source_only {
            let column = self.factory.column_model(pair.source, property);
            if has_default(&column) {
                operations.add(
                    self.factory
                        .drop_default_constraint(table.clone(), column.name.clone()),
                );
            }
            operations.add(self.factory.drop_column(table.clone(), column.name));
        }
    }

    fn diff_primary_keys(
        &self,
        pair: &EntityPair<'_>,
        property_map: &PropertyMap,
        table: &SchemaQualifiedName,
        operations: &mut MigrationOperationCollection,
    ) {
        let source_key = pair.source.primary_key.as_ref();
        let target_key = pair.target.primary_key.as_ref();

        let equivalent = match (source_key, target_key) {
            (Some(source_key), Some(target_key)) => {
                names::key_name(pair.source, source_key) == names::key_name(pair.target, target_key)
                    && property_map.lists_map(
                        &pair.source.name,
                        &source_key.properties,
                        &pair.target.name,
                        &target_key.properties,
                    )
            }
            (None, None) => true,
            _ => false,
        };
        if equivalent {
            return;
        }

        if let Some(source_key) = source_key {
            operations.add(
                self.factory
                    .drop_primary_key(table.clone(), names::key_name(pair.source, source_key)),
            );
        }
        if let Some(target_key) = target_key {
            operations.add(MigrationOperation::AddPrimaryKey(
                self.factory.primary_key_definition(pair.target, target_key),
            ));
        }
    }

    fn diff_unique_constraints(
        &self,
        pair: &EntityPair<'_>,
        property_map: &PropertyMap,
        table: &SchemaQualifiedName,
        operations: &mut MigrationOperationCollection,
    ) {
        for target_key in &pair.target.alternate_keys {
            let exists = pair.source.alternate_keys.iter().any(|source_key| {
                names::alternate_key_name(pair.source, source_key)
                    == names::alternate_key_name(pair.target, target_key)
                    && property_map.lists_map(
                        &pair.source.name,
                        &source_key.properties,
                        &pair.target.name,
                        &target_key.properties,
                    )
            });
            if !exists {
                operations.add(MigrationOperation::AddUniqueConstraint(
                    self.factory
                        .unique_constraint_definition(pair.target, target_key),
                ));
            }
        }

        for source_key in &pair.source.alternate_keys {
            let survives = pair.target.alternate_keys.iter().any(|target_key| {
                names::alternate_key_name(pair.source, source_key)
                    == names::alternate_key_name(pair.target, target_key)
                    && property_map.lists_map(
                        &pair.source.name,
                        &source_key.properties,
                        &pair.target.name,
                        &target_key.properties,
                    )
            });
            if !survives {
                operations.add(self.factory.drop_unique_constraint(
                    table.clone(),
                    names::alternate_key_name(pair.source, source_key),
                ));
            }
        }
    }

    fn diff_foreign_keys(
        &self,
        source: &SchemaModel,
        target: &SchemaModel,
        pair: &EntityPair<'_>,
        property_map: &PropertyMap,
        table: &SchemaQualifiedName,
        operations: &mut MigrationOperationCollection,
    ) {
        for target_fk in &pair.target.foreign_keys {
            let Some(target_referenced) = target.entity_type(&target_fk.referenced_entity) else {
                continue;
            };
            let exists = pair.source.foreign_keys.iter().any(|source_fk| {
                foreign_keys_equivalent(source, target, pair, property_map, source_fk, target_fk)
            });
            if !exists {
                operations.add(MigrationOperation::AddForeignKey(
                    self.factory
                        .foreign_key_definition(pair.target, target_fk, target_referenced),
                ));
            }
        }

        for source_fk in &pair.source.foreign_keys {
            let Some(source_referenced) = source.entity_type(&source_fk.referenced_entity) else {
                continue;
            };
            let survives = pair.target.foreign_keys.iter().any(|target_fk| {
                foreign_keys_equivalent(source, target, pair, property_map, source_fk, target_fk)
            });
            if !survives {
                operations.add(self.factory.drop_foreign_key(
                    table.clone(),
                    names::foreign_key_name(pair.source, source_fk, source_referenced),
                ));
            }
        }
    }

    /// Index renames are detected by a name mismatch between structurally
    /// equivalent indexes.
    fn diff_indexes(
        &self,
        pair: &EntityPair<'_>,
        property_map: &PropertyMap,
        table: &SchemaQualifiedName,
        operations: &mut MigrationOperationCollection,
    ) {
        let mut matched_source = vec![false; pair.source.indexes.len()];

        for target_index in &pair.target.indexes {
            let equivalent = pair
                .source
                .indexes
                .iter()
                .enumerate()
                .find(|(source_idx, source_index)| {
                    !matched_source[*source_idx]
                        && source_index.unique == target_index.unique
                        && property_map.lists_map(
                            &pair.source.name,
                            &source_index.properties,
                            &pair.target.name,
                            &target_index.properties,
                        )
                });

            match equivalent {
                Some((source_idx, source_index)) => {
                    matched_source[source_idx] = true;
                    let source_name = names::index_name(pair.source, source_index);
                    let target_name = names::index_name(pair.target, target_index);
                    if source_name != target_name {
                        operations.add(self.factory.rename_index(
                            table.clone(),
                            source_name,
                            target_name,
                        ));
                    }
                }
                None => operations.add(MigrationOperation::CreateIndex(
                    self.factory.index_definition(pair.target, target_index),
                )),
            }
        }

        for (source_idx, source_index) in pair.source.indexes.iter().enumerate() {
            if !matched_source[source_idx] {
                operations.add(self.factory.drop_index(
                    table.clone(),
                    names::index_name(pair.source, source_index),
                ));
            }
        }
    }
}

fn find_sequence<'m>(model: &'m SchemaModel, like: &Sequence) -> Option<&'m Sequence> {
    model
        .sequences
        .iter()
        .find(|sequence| sequence.name == like.name && sequence.schema == like.schema)
}

fn foreign_keys_equivalent(
    source: &SchemaModel,
    target: &SchemaModel,
    pair: &EntityPair<'_>,
    property_map: &PropertyMap,
    source_fk: &ForeignKey,
    target_fk: &ForeignKey,
) -> bool {
    let Some(source_referenced) = source.entity_type(&source_fk.referenced_entity) else {
        return false;
    };
    let Some(target_referenced) = target.entity_type(&target_fk.referenced_entity) else {
        return false;
    };

    names::foreign_key_name(pair.source, source_fk, source_referenced)
        == names::foreign_key_name(pair.target, target_fk, target_referenced)
        && property_map.lists_map(
            &pair.source.name,
            &source_fk.properties,
            &pair.target.name,
            &target_fk.properties,
        )
        && property_map.lists_map(
            &source_fk.referenced_entity,
            &source_fk.referenced_properties,
            &target_fk.referenced_entity,
            &target_fk.referenced_properties,
        )
}

/// Columns are equivalent when kind, resolved storage type, defaults,
/// nullability, generation flags, concurrency role, and max length all
/// agree; names are compared separately for rename detection.
fn columns_equivalent(a: &ColumnModel, b: &ColumnModel) -> bool {
    columns_equivalent_ignoring_defaults(a, b)
        && a.default_value == b.default_value
        && a.default_sql == b.default_sql
}

fn columns_equivalent_ignoring_defaults(a: &ColumnModel, b: &ColumnModel) -> bool {
    a.kind == b.kind
        && a.storage_type == b.storage_type
        && a.nullable == b.nullable
        && a.identity == b.identity
        && a.computed == b.computed
        && a.concurrency_token == b.concurrency_token
        && a.max_length == b.max_length
}

fn has_default(column: &ColumnModel) -> bool {
    column.default_value.is_some() || column.default_sql.is_some()
}
