use std::fmt::Write as _;

use relmig_core::{
    ColumnModel, DefaultValue, ForeignKeyDefinition, IndexDefinition, MigrationOperation, Result,
    SchemaQualifiedName, SqlGenerator, SqlHelper, SqlStatement, TableDefinition,
    UniqueConstraintDefinition, unsupported_operation,
};

const DIALECT_NAME: &str = "sqlite";
const HELPER: SqlHelper = SqlHelper::new('"', '"');

/// Renders the operations SQLite can execute directly. Databases and
/// sequences do not exist here, and subordinate alterations against an
/// existing table must have been rewritten into the rebuild protocol by the
/// pre-processor; all of those raise operation-not-supported.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn dialect(&self) -> &str {
        DIALECT_NAME
    }

    fn generate_ddl(&self, operations: &[MigrationOperation]) -> Result<Vec<SqlStatement>> {
        operations.iter().map(emit).collect()
    }
}

fn emit(operation: &MigrationOperation) -> Result<SqlStatement> {
    let sql = match operation {
        MigrationOperation::CreateTable(table) => render_create_table(table),
        MigrationOperation::DropTable { name } => {
            format!("DROP TABLE {}", flatten(name))
        }
        MigrationOperation::RenameTable { name, new_name } => {
            format!(
                "ALTER TABLE {} RENAME TO {}",
                flatten(name),
                flatten(&name.with_name(new_name.clone()))
            )
        }
        // Schemas are flattened into the table identifier, so a move is a
        // rename to the re-prefixed name.
        MigrationOperation::MoveTable { name, new_schema } => {
            format!(
                "ALTER TABLE {} RENAME TO {}",
                flatten(name),
                flatten(&SchemaQualifiedName::new(
                    new_schema.clone(),
                    name.name.clone()
                ))
            )
        }
        MigrationOperation::AddColumn { table, column } => {
            format!(
                "ALTER TABLE {} ADD COLUMN {}",
                flatten(table),
                column_definition(column)
            )
        }
        MigrationOperation::CreateIndex(index) => render_create_index(index),
        MigrationOperation::DropIndex { name, .. } => {
            format!("DROP INDEX {}", HELPER.delimit(name))
        }
        MigrationOperation::CopyData {
            source,
            source_columns,
            target,
            target_columns,
        } => {
            format!(
                "INSERT INTO {} ({}) SELECT {} FROM {}",
                flatten(target),
                HELPER.column_list(target_columns),
                HELPER.column_list(source_columns),
                flatten(source)
            )
        }
        MigrationOperation::CreateDatabase { .. }
        | MigrationOperation::DropDatabase { .. }
        | MigrationOperation::CreateSequence { .. }
        | MigrationOperation::DropSequence { .. }
        | MigrationOperation::MoveSequence { .. }
        | MigrationOperation::RenameSequence { .. }
        | MigrationOperation::AlterSequence { .. }
        | MigrationOperation::AlterColumn { .. }
        | MigrationOperation::DropColumn { .. }
        | MigrationOperation::AddDefaultConstraint { .. }
        | MigrationOperation::DropDefaultConstraint { .. }
        | MigrationOperation::RenameColumn { .. }
        | MigrationOperation::AddPrimaryKey(_)
        | MigrationOperation::DropPrimaryKey { .. }
        | MigrationOperation::AddUniqueConstraint(_)
        | MigrationOperation::DropUniqueConstraint { .. }
        | MigrationOperation::AddForeignKey(_)
        | MigrationOperation::DropForeignKey { .. }
        | MigrationOperation::RenameIndex { .. } => {
            return Err(unsupported_operation(DIALECT_NAME, operation));
        }
    };

    Ok(SqlStatement::new(sql))
}

fn render_create_table(table: &TableDefinition) -> String {
    let mut definitions = Vec::new();
    for column in &table.columns {
        definitions.push(format!("    {}", column_definition(column)));
    }
    if let Some(primary_key) = &table.primary_key {
        definitions.push(format!(
            "    CONSTRAINT {} PRIMARY KEY ({})",
            HELPER.delimit(&primary_key.name),
            HELPER.column_list(&primary_key.columns)
        ));
    }
    for unique in &table.unique_constraints {
        definitions.push(format!("    {}", unique_constraint(unique)));
    }
    for foreign_key in &table.foreign_keys {
        definitions.push(format!("    {}", foreign_key_constraint(foreign_key)));
    }

    format!(
        "CREATE TABLE {} (\n{}\n)",
        flatten(&table.name),
        definitions.join(",\n")
    )
}

fn render_create_index(index: &IndexDefinition) -> String {
    let unique = if index.unique { "UNIQUE " } else { "" };
    format!(
        "CREATE {unique}INDEX {} ON {} ({})",
        HELPER.delimit(&index.name),
        flatten(&index.table),
        HELPER.column_list(&index.columns)
    )
}

fn unique_constraint(unique: &UniqueConstraintDefinition) -> String {
    format!(
        "CONSTRAINT {} UNIQUE ({})",
        HELPER.delimit(&unique.name),
        HELPER.column_list(&unique.columns)
    )
}

fn foreign_key_constraint(foreign_key: &ForeignKeyDefinition) -> String {
    let mut sql = format!(
        "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        HELPER.delimit(&foreign_key.name),
        HELPER.column_list(&foreign_key.columns),
        flatten(&foreign_key.referenced_table),
        HELPER.column_list(&foreign_key.referenced_columns)
    );
    if foreign_key.cascade_delete {
        sql.push_str(" ON DELETE CASCADE");
    }
    sql
}

fn column_definition(column: &ColumnModel) -> String {
    let default = column
        .default_sql
        .clone()
        .or_else(|| column.default_value.as_ref().map(literal));
    HELPER.column_definition(column, default)
}

fn literal(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Bool(value) => {
            if *value {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        DefaultValue::Integer(value) => value.to_string(),
        DefaultValue::Float(value) => value.to_string(),
        DefaultValue::Decimal(value) => value.clone(),
        DefaultValue::Text(value) | DefaultValue::Guid(value) | DefaultValue::DateTime(value) => {
            HELPER.quote_literal(value)
        }
        DefaultValue::Bytes(bytes) => {
            let mut sql = String::from("X'");
            write!(sql, "{}", HELPER.hex(bytes)).expect("writing to String should not fail");
            sql.push('\'');
            sql
        }
    }
}

/// Dialects without schemas flatten a qualified name into one identifier by
/// concatenation with a period: `("my", "Pony")` becomes `"my.Pony"`.
fn flatten(name: &SchemaQualifiedName) -> String {
    HELPER.delimit(&name.to_string())
}
