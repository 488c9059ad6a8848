use crate::model::{
    DefaultValue, EntityType, ForeignKey, Index, Key, Property, SchemaModel, SchemaQualifiedName,
    Sequence,
};
use crate::names;
use crate::operations::{
    ColumnModel, ForeignKeyDefinition, IndexDefinition, MigrationOperation, PrimaryKeyDefinition,
    TableDefinition, UniqueConstraintDefinition,
};
use crate::type_mapper::TypeMapper;

/// Pure constructor service for migration operations.
///
/// Each method snapshots the metadata it receives into a value-typed
/// operation: names are resolved through [`names`] and column storage types
/// through the dialect [`TypeMapper`]. Inputs are never mutated and the
/// database is never consulted.
#[derive(Clone, Copy)]
pub struct OperationFactory<'a> {
    type_mapper: &'a dyn TypeMapper,
}

impl<'a> OperationFactory<'a> {
    #[must_use]
    pub fn new(type_mapper: &'a dyn TypeMapper) -> Self {
        Self { type_mapper }
    }

    /// Snapshots one property into a column, resolving the storage type
    /// from the explicit override or the dialect mapper.
    #[must_use]
    pub fn column_model(&self, entity: &EntityType, property: &Property) -> ColumnModel {
        let is_key = entity.is_key_property(&property.name);
        let storage_type = property.storage_type.clone().unwrap_or_else(|| {
            self.type_mapper.storage_type(property, is_key)
        });

        ColumnModel {
            name: names::column_name(property),
            kind: property.kind,
            storage_type,
            nullable: property.nullable,
            max_length: property.max_length,
            identity: property.generated_on_add,
            computed: property.store_computed,
            concurrency_token: property.concurrency_token,
            default_value: property.default_value.clone(),
            default_sql: property.default_sql.clone(),
        }
    }

    /// Builds a create-table operation with its primary key, unique
    /// constraints, and foreign keys inlined. Foreign keys whose referenced
    /// entity is absent from the model produce no constraint.
    #[must_use]
    pub fn create_table(&self, model: &SchemaModel, entity: &EntityType) -> TableDefinition {
        let columns = entity
            .properties
            .iter()
            .map(|property| self.column_model(entity, property))
            .collect();

        let primary_key = entity
            .primary_key
            .as_ref()
            .map(|key| self.primary_key_definition(entity, key));

        let unique_constraints = entity
            .alternate_keys
            .iter()
            .map(|key| self.unique_constraint_definition(entity, key))
            .collect();

        let foreign_keys = entity
            .foreign_keys
            .iter()
            .filter_map(|foreign_key| {
                model
                    .entity_type(&foreign_key.referenced_entity)
                    .map(|referenced| self.foreign_key_definition(entity, foreign_key, referenced))
            })
            .collect();

        TableDefinition {
            name: names::full_table_name(entity),
            columns,
            primary_key,
            unique_constraints,
            foreign_keys,
        }
    }

    #[must_use]
    pub fn drop_table(&self, entity: &EntityType) -> MigrationOperation {
        MigrationOperation::DropTable {
            name: names::full_table_name(entity),
        }
    }

    #[must_use]
    pub fn rename_table(
        &self,
        name: SchemaQualifiedName,
        new_name: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::RenameTable {
            name,
            new_name: new_name.into(),
        }
    }

    #[must_use]
    pub fn move_table(
        &self,
        name: SchemaQualifiedName,
        new_schema: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::MoveTable {
            name,
            new_schema: new_schema.into(),
        }
    }

    #[must_use]
    pub fn add_column(&self, entity: &EntityType, property: &Property) -> MigrationOperation {
        MigrationOperation::AddColumn {
            table: names::full_table_name(entity),
            column: self.column_model(entity, property),
        }
    }

    #[must_use]
    pub fn drop_column(
        &self,
        table: SchemaQualifiedName,
        column: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::DropColumn {
            table,
            column: column.into(),
        }
    }

    #[must_use]
    pub fn alter_column(&self, entity: &EntityType, property: &Property) -> MigrationOperation {
        MigrationOperation::AlterColumn {
            table: names::full_table_name(entity),
            column: self.column_model(entity, property),
        }
    }

    /// Renames `column` to `new_column` on `table`.
    #[must_use]
    pub fn rename_column(
        &self,
        table: SchemaQualifiedName,
        column: impl Into<String>,
        new_column: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::RenameColumn {
            table,
            name: column.into(),
            new_name: new_column.into(),
        }
    }

    #[must_use]
    pub fn add_default_constraint(
        &self,
        table: SchemaQualifiedName,
        column: impl Into<String>,
        value: Option<DefaultValue>,
        sql: Option<String>,
    ) -> MigrationOperation {
        MigrationOperation::AddDefaultConstraint {
            table,
            column: column.into(),
            value,
            sql,
        }
    }

    #[must_use]
    pub fn drop_default_constraint(
        &self,
        table: SchemaQualifiedName,
        column: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::DropDefaultConstraint {
            table,
            column: column.into(),
        }
    }

    #[must_use]
    pub fn primary_key_definition(&self, entity: &EntityType, key: &Key) -> PrimaryKeyDefinition {
        PrimaryKeyDefinition {
            table: names::full_table_name(entity),
            name: names::key_name(entity, key),
            columns: self.key_columns(entity, &key.properties),
            clustered: key.clustered,
        }
    }

    #[must_use]
    pub fn drop_primary_key(
        &self,
        table: SchemaQualifiedName,
        name: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::DropPrimaryKey {
            table,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn drop_unique_constraint(
        &self,
        table: SchemaQualifiedName,
        name: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::DropUniqueConstraint {
            table,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn drop_foreign_key(
        &self,
        table: SchemaQualifiedName,
        name: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::DropForeignKey {
            table,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn drop_index(
        &self,
        table: SchemaQualifiedName,
        name: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::DropIndex {
            table,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn unique_constraint_definition(
        &self,
        entity: &EntityType,
        key: &Key,
    ) -> UniqueConstraintDefinition {
        UniqueConstraintDefinition {
            table: names::full_table_name(entity),
            name: names::alternate_key_name(entity, key),
            columns: self.key_columns(entity, &key.properties),
        }
    }

    #[must_use]
    pub fn foreign_key_definition(
        &self,
        entity: &EntityType,
        foreign_key: &ForeignKey,
        referenced: &EntityType,
    ) -> ForeignKeyDefinition {
        ForeignKeyDefinition {
            table: names::full_table_name(entity),
            name: names::foreign_key_name(entity, foreign_key, referenced),
            columns: self.key_columns(entity, &foreign_key.properties),
            referenced_table: names::full_table_name(referenced),
            referenced_columns: self.key_columns(referenced, &foreign_key.referenced_properties),
            cascade_delete: foreign_key.cascade_delete,
        }
    }

    #[must_use]
    pub fn index_definition(&self, entity: &EntityType, index: &Index) -> IndexDefinition {
        IndexDefinition {
            table: names::full_table_name(entity),
            name: names::index_name(entity, index),
            columns: self.key_columns(entity, &index.properties),
            unique: index.unique,
            clustered: index.clustered,
        }
    }

    #[must_use]
    pub fn rename_index(
        &self,
        table: SchemaQualifiedName,
        name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::RenameIndex {
            table,
            name: name.into(),
            new_name: new_name.into(),
        }
    }

    #[must_use]
    pub fn create_sequence(&self, sequence: &Sequence) -> MigrationOperation {
        MigrationOperation::CreateSequence {
            name: names::full_sequence_name(sequence),
            storage_type: self.type_mapper.sequence_storage_type(sequence.kind),
            start: sequence.start,
            increment: sequence.increment,
            min_value: sequence.min_value,
            max_value: sequence.max_value,
        }
    }

    #[must_use]
    pub fn drop_sequence(&self, sequence: &Sequence) -> MigrationOperation {
        MigrationOperation::DropSequence {
            name: names::full_sequence_name(sequence),
        }
    }

    #[must_use]
    pub fn alter_sequence(&self, sequence: &Sequence, increment: i64) -> MigrationOperation {
        MigrationOperation::AlterSequence {
            name: names::full_sequence_name(sequence),
            increment,
        }
    }

    #[must_use]
    pub fn move_sequence(
        &self,
        name: SchemaQualifiedName,
        new_schema: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::MoveSequence {
            name,
            new_schema: new_schema.into(),
        }
    }

    #[must_use]
    pub fn rename_sequence(
        &self,
        name: SchemaQualifiedName,
        new_name: impl Into<String>,
    ) -> MigrationOperation {
        MigrationOperation::RenameSequence {
            name,
            new_name: new_name.into(),
        }
    }

    #[must_use]
    pub fn copy_data(
        &self,
        source: SchemaQualifiedName,
        source_columns: Vec<String>,
        target: SchemaQualifiedName,
        target_columns: Vec<String>,
    ) -> MigrationOperation {
        MigrationOperation::CopyData {
            source,
            source_columns,
            target,
            target_columns,
        }
    }

    #[must_use]
    pub fn create_database(&self, name: impl Into<String>) -> MigrationOperation {
        MigrationOperation::CreateDatabase { name: name.into() }
    }

    #[must_use]
    pub fn drop_database(&self, name: impl Into<String>) -> MigrationOperation {
        MigrationOperation::DropDatabase { name: name.into() }
    }

    fn key_columns(&self, entity: &EntityType, properties: &[String]) -> Vec<String> {
        properties
            .iter()
            .map(|name| {
                entity
                    .property(name)
                    .map_or_else(|| name.clone(), names::column_name)
            })
            .collect()
    }
}

impl std::fmt::Debug for OperationFactory<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationFactory").finish_non_exhaustive()
    }
}
