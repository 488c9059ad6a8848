use std::collections::BTreeMap;

use relmig_core::{
    Error, MigrationError, MigrationOperation, OperationFactory, OperationPreProcessor, Result,
    SchemaModel, SchemaQualifiedName, TEMP_NAME_PREFIX, TableDefinition, names,
};

use crate::type_mapper::SqliteTypeMapper;

/// SQLite cannot alter most table subordinates in place. This pre-processor
/// tracks pending changes per table and rewrites anything unsupported into
/// the rebuild-table protocol: rename the existing table aside, recreate it
/// from the target model, copy the surviving rows, and drop the original.
///
/// Handlers upgrade one way only (`Create` or `Alter` never replaces a
/// `Rebuild`), and the deferred drop of the renamed-aside table is emitted
/// after every other handler has flushed, so a failure between steps leaves
/// the `__mig_tmp__`-prefixed table behind as a recoverable marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlitePreProcessor;

impl OperationPreProcessor for SqlitePreProcessor {
    fn process(
        &self,
        operations: Vec<MigrationOperation>,
        source: &SchemaModel,
        target: &SchemaModel,
    ) -> Result<Vec<MigrationOperation>> {
        let mapper = SqliteTypeMapper;
        let factory = OperationFactory::new(&mapper);
        let mut pending = PendingOperations::new(source, target, factory);
        for operation in operations {
            pending.push(operation)?;
        }
        pending.finish()
    }
}

struct PendingOperations<'a> {
    source: &'a SchemaModel,
    target: &'a SchemaModel,
    factory: OperationFactory<'a>,
    handlers: Vec<TableHandlerEntry>,
    output: Vec<MigrationOperation>,
    deferred_drops: Vec<MigrationOperation>,
}

struct TableHandlerEntry {
    /// Physical name of the table when the handler was installed; renames
    /// absorbed afterwards never reach the database until the flush.
    installed: SchemaQualifiedName,
    /// Name the table carries at this point of the plan.
    current: SchemaQualifiedName,
    handler: TableHandler,
}

enum TableHandler {
    /// Table is created inside this plan; foreign keys already inlined in
    /// the create are swallowed when they arrive again as operations.
    Create(TableDefinition),
    /// Table exists in the source schema and only needs operations SQLite
    /// supports in place (column add, table rename, table move), replayed
    /// verbatim.
    Alter(Vec<MigrationOperation>),
    /// At least one unsupported subordinate arrived; the table is rebuilt
    /// from the target model.
    Rebuild(RebuildState),
}

struct RebuildState {
    /// current column name → original source column name. Renames re-point
    /// an entry, drops remove it; columns added inside the batch never had
    /// one, so they are not copied.
    column_name_pairs: BTreeMap<String, String>,
}

impl<'a> PendingOperations<'a> {
    fn new(
        source: &'a SchemaModel,
        target: &'a SchemaModel,
        factory: OperationFactory<'a>,
    ) -> Self {
        Self {
            source,
            target,
            factory,
            handlers: Vec::new(),
            output: Vec::new(),
            deferred_drops: Vec::new(),
        }
    }

    fn push(&mut self, operation: MigrationOperation) -> Result<()> {
        match operation {
            MigrationOperation::CreateTable(table) => {
                if let Some(idx) = self.handler_index(&table.name) {
                    let entry = self.handlers.remove(idx);
                    self.flush(entry)?;
                }
                self.handlers.push(TableHandlerEntry {
                    installed: table.name.clone(),
                    current: table.name.clone(),
                    handler: TableHandler::Create(table),
                });
            }

            MigrationOperation::RenameTable { name, new_name } => {
                let renamed = name.with_name(new_name.clone());
                self.push_supported(
                    name.clone(),
                    renamed,
                    MigrationOperation::RenameTable { name, new_name },
                )?;
            }
            MigrationOperation::MoveTable { name, new_schema } => {
                let moved = name.with_schema(new_schema.clone());
                self.push_supported(
                    name.clone(),
                    moved,
                    MigrationOperation::MoveTable { name, new_schema },
                )?;
            }
            MigrationOperation::AddColumn { table, column } => {
                let unchanged = table.clone();
                self.push_supported(
                    table.clone(),
                    unchanged,
                    MigrationOperation::AddColumn { table, column },
                )?;
            }

            MigrationOperation::AddForeignKey(fk) => {
                let inlined = match self.handler_index(&fk.table) {
                    Some(idx) => match &self.handlers[idx].handler {
                        TableHandler::Create(create) => {
                            if !create
                                .foreign_keys
                                .iter()
                                .any(|declared| declared.name == fk.name)
                            {
                                return Err(invalid_sequence(
                                    &fk.table,
                                    &format!(
                                        "foreign key `{}` is not declared on the created table",
                                        fk.name
                                    ),
                                ));
                            }
                            true
                        }
                        _ => false,
                    },
                    None => false,
                };
                if !inlined {
                    let table = fk.table.clone();
                    self.push_rebuild(table, MigrationOperation::AddForeignKey(fk))?;
                }
            }

            operation if rebuild_trigger(&operation) => {
                let table = operation
                    .table()
                    .cloned()
                    .expect("rebuild triggers are table-scoped");
                self.push_rebuild(table, operation)?;
            }

            MigrationOperation::RenameIndex {
                table,
                name,
                new_name,
            } => {
                self.flush_table(&table)?;
                self.expand_rename_index(table, name, new_name)?;
            }
            MigrationOperation::CreateIndex(index) => {
                self.flush_table(&index.table)?;
                self.output.push(MigrationOperation::CreateIndex(index));
            }
            MigrationOperation::DropIndex { table, name } => {
                self.flush_table(&table)?;
                self.output
                    .push(MigrationOperation::DropIndex { table, name });
            }
            MigrationOperation::DropTable { name } => {
                self.flush_table(&name)?;
                self.output.push(MigrationOperation::DropTable { name });
            }

            other => self.output.push(other),
        }

        Ok(())
    }

    fn finish(mut self) -> Result<Vec<MigrationOperation>> {
        while !self.handlers.is_empty() {
            let entry = self.handlers.remove(0);
            self.flush(entry)?;
        }
        self.output.append(&mut self.deferred_drops);
        Ok(self.output)
    }

    /// Routes an operation SQLite can execute in place: accumulated by the
    /// table's alter handler, absorbed by a rebuild, and rejected after a
    /// create.
    fn push_supported(
        &mut self,
        table: SchemaQualifiedName,
        renamed_to: SchemaQualifiedName,
        operation: MigrationOperation,
    ) -> Result<()> {
        match self.handler_index(&table) {
            Some(idx) => {
                let entry = &mut self.handlers[idx];
                match &mut entry.handler {
                    TableHandler::Create(_) => {
                        return Err(invalid_sequence(
                            &table,
                            &format!(
                                "`{}` cannot follow the table's creation in the same plan",
                                operation.kind().as_str()
                            ),
                        ));
                    }
                    TableHandler::Alter(pending) => pending.push(operation),
                    TableHandler::Rebuild(_) => {
                        // the recreated table realizes renames and new
                        // columns; nothing is emitted here
                    }
                }
                entry.current = renamed_to;
            }
            None => {
                self.handlers.push(TableHandlerEntry {
                    installed: table,
                    current: renamed_to,
                    handler: TableHandler::Alter(vec![operation]),
                });
            }
        }
        Ok(())
    }

    /// Routes an operation SQLite cannot execute in place, installing or
    /// upgrading to a rebuild handler.
    fn push_rebuild(
        &mut self,
        table: SchemaQualifiedName,
        operation: MigrationOperation,
    ) -> Result<()> {
        let idx = match self.handler_index(&table) {
            Some(idx) => idx,
            None => {
                let pairs = self.seed_column_pairs(&table)?;
                tracing::debug!(table = %table, "installing table rebuild");
                self.handlers.push(TableHandlerEntry {
                    installed: table.clone(),
                    current: table.clone(),
                    handler: TableHandler::Rebuild(RebuildState {
                        column_name_pairs: pairs,
                    }),
                });
                self.handlers.len() - 1
            }
        };

        if matches!(self.handlers[idx].handler, TableHandler::Create(_)) {
            return Err(invalid_sequence(
                &table,
                &format!(
                    "`{}` cannot follow the table's creation in the same plan",
                    operation.kind().as_str()
                ),
            ));
        }
        if matches!(self.handlers[idx].handler, TableHandler::Alter(_)) {
            let installed = self.handlers[idx].installed.clone();
            let pairs = self.seed_column_pairs(&installed)?;
            tracing::debug!(table = %self.handlers[idx].current, "upgrading to table rebuild");
            self.handlers[idx].handler = TableHandler::Rebuild(RebuildState {
                column_name_pairs: pairs,
            });
        }

        let TableHandler::Rebuild(state) = &mut self.handlers[idx].handler else {
            return Ok(());
        };
        match operation {
            MigrationOperation::RenameColumn { name, new_name, .. } => {
                if let Some(original) = state.column_name_pairs.remove(&name) {
                    state.column_name_pairs.insert(new_name, original);
                }
            }
            MigrationOperation::DropColumn { column, .. } => {
                state.column_name_pairs.remove(&column);
            }
            _ => {}
        }
        Ok(())
    }

    /// Forces `HandlePendingOperations` for one table, if it has a handler.
    fn flush_table(&mut self, table: &SchemaQualifiedName) -> Result<()> {
        if let Some(idx) = self.handler_index(table) {
            let entry = self.handlers.remove(idx);
            self.flush(entry)?;
        }
        Ok(())
    }

    fn flush(&mut self, entry: TableHandlerEntry) -> Result<()> {
        match entry.handler {
            TableHandler::Create(table) => {
                self.output.push(MigrationOperation::CreateTable(table));
            }
            TableHandler::Alter(pending) => self.output.extend(pending),
            TableHandler::Rebuild(state) => {
                self.flush_rebuild(entry.installed, entry.current, state)?;
            }
        }
        Ok(())
    }

    fn flush_rebuild(
        &mut self,
        installed: SchemaQualifiedName,
        current: SchemaQualifiedName,
        state: RebuildState,
    ) -> Result<()> {
        let Some(entity) = self.target.entity_type_with_table(&current) else {
            return Err(invalid_sequence(
                &current,
                "rebuilt table not found in the target model",
            ));
        };

        // When the table keeps its name, the old incarnation must be
        // renamed aside before the new one can be created.
        let copy_source = if current == installed {
            let temp = installed.with_name(format!("{TEMP_NAME_PREFIX}{}", installed.name));
            self.output.push(MigrationOperation::RenameTable {
                name: installed.clone(),
                new_name: temp.name.clone(),
            });
            temp
        } else {
            installed
        };

        let table = self.factory.create_table(self.target, entity);
        let mut source_columns = Vec::new();
        let mut target_columns = Vec::new();
        for column in &table.columns {
            if let Some(original) = state.column_name_pairs.get(&column.name) {
                target_columns.push(column.name.clone());
                source_columns.push(original.clone());
            }
        }

        tracing::debug!(table = %current, copied = target_columns.len(), "rebuilding table");

        self.output.push(MigrationOperation::CreateTable(table));
        if !target_columns.is_empty() {
            self.output.push(self.factory.copy_data(
                copy_source.clone(),
                source_columns,
                current,
                target_columns,
            ));
        }
        self.deferred_drops
            .push(MigrationOperation::DropTable { name: copy_source });
        Ok(())
    }

    fn expand_rename_index(
        &mut self,
        table: SchemaQualifiedName,
        name: String,
        new_name: String,
    ) -> Result<()> {
        let Some(entity) = self.target.entity_type_with_table(&table) else {
            return Err(invalid_sequence(
                &table,
                "renamed index's table not found in the target model",
            ));
        };
        let Some(index) = entity
            .indexes
            .iter()
            .find(|candidate| names::index_name(entity, candidate) == new_name)
        else {
            return Err(invalid_sequence(
                &table,
                &format!("renamed index `{new_name}` not found in the target model"),
            ));
        };

        self.output.push(MigrationOperation::DropIndex {
            table: table.clone(),
            name,
        });
        self.output.push(MigrationOperation::CreateIndex(
            self.factory.index_definition(entity, index),
        ));
        Ok(())
    }

    fn seed_column_pairs(
        &self,
        table: &SchemaQualifiedName,
    ) -> Result<BTreeMap<String, String>> {
        let Some(entity) = self.source.entity_type_with_table(table) else {
            return Err(invalid_sequence(
                table,
                "rebuilt table not found in the source model",
            ));
        };
        Ok(entity
            .properties
            .iter()
            .map(|property| {
                let column = names::column_name(property);
                (column.clone(), column)
            })
            .collect())
    }

    fn handler_index(&self, table: &SchemaQualifiedName) -> Option<usize> {
        self.handlers.iter().position(|entry| entry.current == *table)
    }
}

/// Subordinates SQLite cannot execute against an existing table without a
/// full rebuild.
fn rebuild_trigger(operation: &MigrationOperation) -> bool {
    matches!(
        operation,
        MigrationOperation::AlterColumn { .. }
            | MigrationOperation::DropColumn { .. }
            | MigrationOperation::AddDefaultConstraint { .. }
            | MigrationOperation::DropDefaultConstraint { .. }
            | MigrationOperation::RenameColumn { .. }
            | MigrationOperation::AddPrimaryKey(_)
            | MigrationOperation::DropPrimaryKey { .. }
            | MigrationOperation::AddUniqueConstraint(_)
            | MigrationOperation::DropUniqueConstraint { .. }
            | MigrationOperation::DropForeignKey { .. }
    )
}

fn invalid_sequence(table: &SchemaQualifiedName, reason: &str) -> Error {
    MigrationError::InvalidOperationSequence {
        table: table.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
