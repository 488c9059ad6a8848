use relmig_core::{
    ColumnModel, DefaultValue, Error, ForeignKeyDefinition, MigrationError, MigrationOperation,
    PrimaryKeyDefinition, PrimitiveKind, SchemaQualifiedName, SqlGenerator, TableDefinition,
};
use relmig_dialect_sqlite::SqliteGenerator;

fn generate(operation: MigrationOperation) -> String {
    let statements = SqliteGenerator
        .generate_ddl(&[operation])
        .expect("generation should succeed");
    assert_eq!(statements.len(), 1);
    statements[0].sql.clone()
}

fn generate_err(operation: MigrationOperation) -> Error {
    SqliteGenerator
        .generate_ddl(&[operation])
        .expect_err("operation should not be expressible")
}

fn column(name: &str, storage_type: &str) -> ColumnModel {
    ColumnModel {
        name: name.to_string(),
        kind: PrimitiveKind::Int32,
        storage_type: storage_type.to_string(),
        nullable: false,
        max_length: None,
        identity: false,
        computed: false,
        concurrency_token: false,
        default_value: None,
        default_sql: None,
    }
}

#[test]
fn create_table_inlines_primary_key_and_foreign_keys() {
    let sql = generate(MigrationOperation::CreateTable(TableDefinition {
        name: SchemaQualifiedName::bare("T2"),
        columns: vec![
            column("Id", "INTEGER"),
            ColumnModel {
                nullable: true,
                ..column("C", "INTEGER")
            },
        ],
        primary_key: Some(PrimaryKeyDefinition {
            table: SchemaQualifiedName::bare("T2"),
            name: "PK_T2".to_string(),
            columns: vec!["Id".to_string()],
            clustered: None,
        }),
        unique_constraints: Vec::new(),
        foreign_keys: vec![ForeignKeyDefinition {
            table: SchemaQualifiedName::bare("T2"),
            name: "FK1".to_string(),
            columns: vec!["C".to_string()],
            referenced_table: SchemaQualifiedName::bare("T1"),
            referenced_columns: vec!["Id".to_string()],
            cascade_delete: false,
        }],
    }));

    let expected = "CREATE TABLE \"T2\" (\n    \
        \"Id\" INTEGER NOT NULL,\n    \
        \"C\" INTEGER,\n    \
        CONSTRAINT \"PK_T2\" PRIMARY KEY (\"Id\"),\n    \
        CONSTRAINT \"FK1\" FOREIGN KEY (\"C\") REFERENCES \"T1\" (\"Id\")\n)";
    assert_eq!(sql, expected);
}

#[test]
fn move_table_flattens_the_schema_into_the_identifier() {
    let sql = generate(MigrationOperation::MoveTable {
        name: SchemaQualifiedName::new("my", "Pony"),
        new_schema: "bro".to_string(),
    });

    assert_eq!(sql, "ALTER TABLE \"my.Pony\" RENAME TO \"bro.Pony\"");
}

#[test]
fn rename_table_keeps_the_flattened_schema_prefix() {
    let sql = generate(MigrationOperation::RenameTable {
        name: SchemaQualifiedName::new("my", "Pony"),
        new_name: "Horse".to_string(),
    });

    assert_eq!(sql, "ALTER TABLE \"my.Pony\" RENAME TO \"my.Horse\"");
}

#[test]
fn copy_data_renders_insert_select() {
    let sql = generate(MigrationOperation::CopyData {
        source: SchemaQualifiedName::bare("__mig_tmp__T2"),
        source_columns: vec!["Id".to_string(), "C".to_string()],
        target: SchemaQualifiedName::bare("T2"),
        target_columns: vec!["Id".to_string(), "C".to_string()],
    });

    assert_eq!(
        sql,
        "INSERT INTO \"T2\" (\"Id\", \"C\") SELECT \"Id\", \"C\" FROM \"__mig_tmp__T2\""
    );
}

#[test]
fn add_column_renders_defaults() {
    let sql = generate(MigrationOperation::AddColumn {
        table: SchemaQualifiedName::bare("T"),
        column: ColumnModel {
            default_value: Some(DefaultValue::Text("pending".to_string())),
            nullable: true,
            ..column("Status", "TEXT")
        },
    });

    assert_eq!(
        sql,
        "ALTER TABLE \"T\" ADD COLUMN \"Status\" TEXT DEFAULT 'pending'"
    );
}

#[test]
fn embedded_quotes_are_doubled_in_identifiers() {
    let sql = generate(MigrationOperation::DropIndex {
        table: SchemaQualifiedName::bare("T"),
        name: "weird\"name".to_string(),
    });

    assert_eq!(sql, "DROP INDEX \"weird\"\"name\"");
}

#[test]
fn database_operations_are_not_supported() {
    let error = generate_err(MigrationOperation::CreateDatabase {
        name: "MyDb".to_string(),
    });

    assert!(matches!(
        error,
        Error::Migration(MigrationError::OperationNotSupported { ref dialect, ref operation })
            if dialect == "sqlite" && operation == "CreateDatabase"
    ));
}

#[test]
fn sequence_operations_are_not_supported() {
    let error = generate_err(MigrationOperation::CreateSequence {
        name: SchemaQualifiedName::bare("Numbers"),
        storage_type: "INTEGER".to_string(),
        start: 0,
        increment: 1,
        min_value: None,
        max_value: None,
    });

    assert!(matches!(
        error,
        Error::Migration(MigrationError::OperationNotSupported { ref operation, .. })
            if operation == "CreateSequence"
    ));
}

#[test]
fn unsupported_subordinates_fail_instead_of_rendering() {
    // the pre-processor is responsible for rewriting these; reaching the
    // generator with one is a bug worth failing loudly on
    let error = generate_err(MigrationOperation::DropColumn {
        table: SchemaQualifiedName::bare("T"),
        column: "C".to_string(),
    });

    assert!(matches!(
        error,
        Error::Migration(MigrationError::OperationNotSupported { ref operation, .. })
            if operation == "DropColumn"
    ));
}
