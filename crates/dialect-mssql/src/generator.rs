use std::fmt::Write as _;

use relmig_core::{
    ColumnModel, DefaultValue, ForeignKeyDefinition, IndexDefinition, MigrationOperation,
    PrimaryKeyDefinition, Result, SchemaQualifiedName, SqlGenerator, SqlHelper, SqlStatement,
    TableDefinition, UniqueConstraintDefinition, unsupported_operation,
};

const DIALECT_NAME: &str = "mssql";
const HELPER: SqlHelper = SqlHelper::new('[', ']');

/// SQL Server DDL generation. Renames go through `sp_rename`, schema moves
/// through `ALTER SCHEMA … TRANSFER`, and dropping a system-named default
/// constraint uses a dynamic lookup against `sys.default_constraints`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn dialect(&self) -> &str {
        DIALECT_NAME
    }

    fn generate_ddl(&self, operations: &[MigrationOperation]) -> Result<Vec<SqlStatement>> {
        let statements = operations.iter().map(emit).collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            operations = operations.len(),
            statements = statements.len(),
            "generated mssql ddl"
        );
        Ok(statements)
    }
}

fn emit(operation: &MigrationOperation) -> Result<SqlStatement> {
    let statement = match operation {
        // CREATE/DROP DATABASE cannot run inside a user transaction.
        MigrationOperation::CreateDatabase { name } => {
            SqlStatement::non_transactional(format!("CREATE DATABASE {}", HELPER.delimit(name)))
        }
        MigrationOperation::DropDatabase { name } => {
            SqlStatement::non_transactional(format!("DROP DATABASE {}", HELPER.delimit(name)))
        }
        MigrationOperation::CreateSequence {
            name,
            storage_type,
            start,
            increment,
            min_value,
            max_value,
        } => {
            let mut sql = format!(
                "CREATE SEQUENCE {} AS {storage_type} START WITH {start} INCREMENT BY {increment}",
                HELPER.delimit_qualified(name)
            );
            if let Some(min_value) = min_value {
                write!(sql, " MINVALUE {min_value}").expect("writing to String should not fail");
            }
            if let Some(max_value) = max_value {
                write!(sql, " MAXVALUE {max_value}").expect("writing to String should not fail");
            }
            SqlStatement::new(sql)
        }
        MigrationOperation::DropSequence { name } => SqlStatement::new(format!(
            "DROP SEQUENCE {}",
            HELPER.delimit_qualified(name)
        )),
        MigrationOperation::MoveSequence { name, new_schema } => {
            SqlStatement::new(transfer(name, new_schema))
        }
        MigrationOperation::RenameSequence { name, new_name } => {
            SqlStatement::new(sp_rename(&name.to_string(), new_name, "OBJECT"))
        }
        MigrationOperation::AlterSequence { name, increment } => SqlStatement::new(format!(
            "ALTER SEQUENCE {} INCREMENT BY {increment}",
            HELPER.delimit_qualified(name)
        )),

        MigrationOperation::CreateTable(table) => SqlStatement::new(render_create_table(table)),
        MigrationOperation::DropTable { name } => SqlStatement::new(format!(
            "DROP TABLE {}",
            HELPER.delimit_qualified(name)
        )),
        MigrationOperation::RenameTable { name, new_name } => {
            SqlStatement::new(sp_rename(&name.to_string(), new_name, "OBJECT"))
        }
        MigrationOperation::MoveTable { name, new_schema } => {
            SqlStatement::new(transfer(name, new_schema))
        }

        MigrationOperation::AddColumn { table, column } => SqlStatement::new(format!(
            "ALTER TABLE {} ADD {}",
            HELPER.delimit_qualified(table),
            column_definition(column)
        )),
        MigrationOperation::DropColumn { table, column } => SqlStatement::new(format!(
            "ALTER TABLE {} DROP COLUMN {}",
            HELPER.delimit_qualified(table),
            HELPER.delimit(column)
        )),
        MigrationOperation::AlterColumn { table, column } => {
            let nullability = if column.nullable { "NULL" } else { "NOT NULL" };
            SqlStatement::new(format!(
                "ALTER TABLE {} ALTER COLUMN {} {} {nullability}",
                HELPER.delimit_qualified(table),
                HELPER.delimit(&column.name),
                column.storage_type
            ))
        }
        MigrationOperation::AddDefaultConstraint {
            table,
            column,
            value,
            sql,
        } => {
            let default = sql
                .clone()
                .or_else(|| value.as_ref().map(literal))
                .unwrap_or_else(|| "NULL".to_string());
            SqlStatement::new(format!(
                "ALTER TABLE {} ADD DEFAULT {default} FOR {}",
                HELPER.delimit_qualified(table),
                HELPER.delimit(column)
            ))
        }
        MigrationOperation::DropDefaultConstraint { table, column } => {
            SqlStatement::new(drop_default_constraint(table, column))
        }
        MigrationOperation::RenameColumn {
            table,
            name,
            new_name,
        } => SqlStatement::new(sp_rename(&format!("{table}.{name}"), new_name, "COLUMN")),

        MigrationOperation::AddPrimaryKey(primary_key) => SqlStatement::new(format!(
            "ALTER TABLE {} ADD {}",
            HELPER.delimit_qualified(&primary_key.table),
            primary_key_constraint(primary_key)
        )),
        MigrationOperation::DropPrimaryKey { table, name } => {
            SqlStatement::new(drop_constraint(table, name))
        }
        MigrationOperation::AddUniqueConstraint(unique) => SqlStatement::new(format!(
            "ALTER TABLE {} ADD {}",
            HELPER.delimit_qualified(&unique.table),
            unique_constraint(unique)
        )),
        MigrationOperation::DropUniqueConstraint { table, name } => {
            SqlStatement::new(drop_constraint(table, name))
        }
        MigrationOperation::AddForeignKey(foreign_key) => SqlStatement::new(format!(
            "ALTER TABLE {} ADD {}",
            HELPER.delimit_qualified(&foreign_key.table),
            foreign_key_constraint(foreign_key)
        )),
        MigrationOperation::DropForeignKey { table, name } => {
            SqlStatement::new(drop_constraint(table, name))
        }

        MigrationOperation::CreateIndex(index) => SqlStatement::new(render_create_index(index)),
        MigrationOperation::DropIndex { table, name } => SqlStatement::new(format!(
            "DROP INDEX {} ON {}",
            HELPER.delimit(name),
            HELPER.delimit_qualified(table)
        )),
        MigrationOperation::RenameIndex {
            table,
            name,
            new_name,
        } => SqlStatement::new(sp_rename(&format!("{table}.{name}"), new_name, "INDEX")),

        MigrationOperation::CopyData { .. } => {
            return Err(unsupported_operation(DIALECT_NAME, operation));
        }
    };

    Ok(statement)
}

fn render_create_table(table: &TableDefinition) -> String {
    let mut definitions = Vec::new();
    for column in &table.columns {
        definitions.push(format!("    {}", column_definition(column)));
    }
    if let Some(primary_key) = &table.primary_key {
        definitions.push(format!("    {}", primary_key_constraint(primary_key)));
    }
    for unique in &table.unique_constraints {
        definitions.push(format!("    {}", unique_constraint(unique)));
    }
    for foreign_key in &table.foreign_keys {
        definitions.push(format!("    {}", foreign_key_constraint(foreign_key)));
    }

    format!(
        "CREATE TABLE {} (\n{}\n)",
        HELPER.delimit_qualified(&table.name),
        definitions.join(",\n")
    )
}

fn render_create_index(index: &IndexDefinition) -> String {
    let unique = if index.unique { "UNIQUE " } else { "" };
    let clustered = if index.clustered == Some(true) {
        "CLUSTERED "
    } else {
        ""
    };
    format!(
        "CREATE {unique}{clustered}INDEX {} ON {} ({})",
        HELPER.delimit(&index.name),
        HELPER.delimit_qualified(&index.table),
        HELPER.column_list(&index.columns)
    )
}

/// Primary keys default to non-clustered unless the operation asks
/// otherwise.
fn primary_key_constraint(primary_key: &PrimaryKeyDefinition) -> String {
    let clustered = if primary_key.clustered == Some(true) {
        "CLUSTERED"
    } else {
        "NONCLUSTERED"
    };
    format!(
        "CONSTRAINT {} PRIMARY KEY {clustered} ({})",
        HELPER.delimit(&primary_key.name),
        HELPER.column_list(&primary_key.columns)
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
        HELPER.delimit_qualified(&foreign_key.referenced_table),
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
    let mut sql = HELPER.column_definition(column, default);
    if column.identity {
        sql.push_str(" IDENTITY");
    }
    sql
}

fn sp_rename(objname: &str, new_name: &str, objtype: &str) -> String {
    format!(
        "EXECUTE sp_rename @objname = N'{}', @newname = N'{}', @objtype = N'{objtype}'",
        escape_literal(objname),
        escape_literal(new_name)
    )
}

fn transfer(name: &SchemaQualifiedName, new_schema: &str) -> String {
    format!(
        "ALTER SCHEMA {} TRANSFER {}",
        HELPER.delimit(new_schema),
        HELPER.delimit_qualified(name)
    )
}

fn drop_constraint(table: &SchemaQualifiedName, name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {}",
        HELPER.delimit_qualified(table),
        HELPER.delimit(name)
    )
}

/// The constraint was system-named at creation, so its current name has to
/// be looked up in `sys.default_constraints` before it can be dropped.
fn drop_default_constraint(table: &SchemaQualifiedName, column: &str) -> String {
    format!(
        "DECLARE @var0 nvarchar(128)\n\
         SELECT @var0 = name FROM sys.default_constraints WHERE parent_object_id = OBJECT_ID(N'{table_literal}') AND COL_NAME(parent_object_id, parent_column_id) = N'{column_literal}'\n\
         EXECUTE('ALTER TABLE {table_delimited} DROP CONSTRAINT \"' + @var0 + '\"')",
        table_literal = escape_literal(&table.to_string()),
        column_literal = escape_literal(column),
        table_delimited = HELPER.delimit_qualified(table)
    )
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
        DefaultValue::Bytes(bytes) => format!("0x{}", HELPER.hex(bytes)),
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}
