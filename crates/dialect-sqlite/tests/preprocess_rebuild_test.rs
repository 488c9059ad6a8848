use relmig_core::{
    ColumnModel, EntityType, Error, ForeignKey, ForeignKeyDefinition, Index, MigrationError,
    MigrationOperation, ModelDiffer, OperationKind, OperationPreProcessor, PrimitiveKind, Property,
    SchemaModel, SchemaQualifiedName, TableDefinition,
};
use relmig_dialect_sqlite::{SqlitePreProcessor, SqliteTypeMapper};

fn property(name: &str) -> Property {
    Property::new(name, PrimitiveKind::Int32)
}

fn entity(name: &str, properties: Vec<Property>) -> EntityType {
    EntityType {
        properties,
        ..EntityType::named(name)
    }
}

fn model(entity_types: Vec<EntityType>) -> SchemaModel {
    SchemaModel::new(entity_types, Vec::new())
}

fn column(name: &str) -> ColumnModel {
    ColumnModel {
        name: name.to_string(),
        kind: PrimitiveKind::Int32,
        storage_type: "INTEGER".to_string(),
        nullable: false,
        max_length: None,
        identity: false,
        computed: false,
        concurrency_token: false,
        default_value: None,
        default_sql: None,
    }
}

fn fk_definition(name: &str) -> ForeignKeyDefinition {
    ForeignKeyDefinition {
        table: SchemaQualifiedName::bare("T2"),
        name: name.to_string(),
        columns: vec!["C".to_string()],
        referenced_table: SchemaQualifiedName::bare("T1"),
        referenced_columns: vec!["Id".to_string()],
        cascade_delete: false,
    }
}

/// Source and target for the canonical rebuild: `T2` gains a foreign key to
/// `T1` and nothing else changes.
fn add_fk_models() -> (SchemaModel, SchemaModel) {
    let source = model(vec![
        entity("T1", vec![property("Id")]),
        entity("T2", vec![property("Id"), property("C")]),
    ]);
    let target = model(vec![
        entity("T1", vec![property("Id")]),
        EntityType {
            foreign_keys: vec![ForeignKey {
                name: Some("FK1".to_string()),
                properties: vec!["C".to_string()],
                referenced_entity: "T1".to_string(),
                referenced_properties: vec!["Id".to_string()],
                cascade_delete: false,
            }],
            ..entity("T2", vec![property("Id"), property("C")])
        },
    ]);
    (source, target)
}

#[test]
fn adding_a_foreign_key_rebuilds_the_table() {
    let (source, target) = add_fk_models();
    let mapper = SqliteTypeMapper;
    let operations = ModelDiffer::new(&mapper).diff(&source, &target);
    assert_eq!(operations.len(), 1, "diff should be a single AddForeignKey");

    let executable = SqlitePreProcessor
        .process(operations, &source, &target)
        .expect("pre-processing should succeed");

    assert_eq!(executable.len(), 4);
    assert_eq!(
        executable[0],
        MigrationOperation::RenameTable {
            name: SchemaQualifiedName::bare("T2"),
            new_name: "__mig_tmp__T2".to_string(),
        }
    );
    assert!(matches!(
        &executable[1],
        MigrationOperation::CreateTable(table)
            if table.name.name == "T2" && table.foreign_keys.len() == 1
    ));
    assert_eq!(
        executable[2],
        MigrationOperation::CopyData {
            source: SchemaQualifiedName::bare("__mig_tmp__T2"),
            source_columns: vec!["Id".to_string(), "C".to_string()],
            target: SchemaQualifiedName::bare("T2"),
            target_columns: vec!["Id".to_string(), "C".to_string()],
        }
    );
    assert_eq!(
        executable[3],
        MigrationOperation::DropTable {
            name: SchemaQualifiedName::bare("__mig_tmp__T2"),
        }
    );
}

#[test]
fn create_table_handler_swallows_inlined_foreign_keys() {
    let (source, target) = add_fk_models();
    let create = MigrationOperation::CreateTable(TableDefinition {
        name: SchemaQualifiedName::bare("T2"),
        columns: vec![column("Id"), column("C")],
        primary_key: None,
        unique_constraints: Vec::new(),
        foreign_keys: vec![fk_definition("FK1")],
    });

    let executable = SqlitePreProcessor
        .process(
            vec![
                create.clone(),
                MigrationOperation::AddForeignKey(fk_definition("FK1")),
            ],
            &source,
            &target,
        )
        .expect("inlined foreign key should be swallowed");

    assert_eq!(executable, vec![create]);
}

#[test]
fn undeclared_foreign_key_after_create_is_a_sequence_error() {
    let (source, target) = add_fk_models();
    let create = MigrationOperation::CreateTable(TableDefinition {
        name: SchemaQualifiedName::bare("T2"),
        columns: vec![column("Id"), column("C")],
        primary_key: None,
        unique_constraints: Vec::new(),
        foreign_keys: Vec::new(),
    });

    let error = SqlitePreProcessor
        .process(
            vec![create, MigrationOperation::AddForeignKey(fk_definition("FK9"))],
            &source,
            &target,
        )
        .expect_err("the foreign key is not declared on the create");

    assert!(matches!(
        error,
        Error::Migration(MigrationError::InvalidOperationSequence { ref table, .. })
            if table == "T2"
    ));
}

#[test]
fn supported_operations_replay_verbatim() {
    let (source, target) = add_fk_models();
    let add_column = MigrationOperation::AddColumn {
        table: SchemaQualifiedName::bare("T2"),
        column: column("Extra"),
    };

    let executable = SqlitePreProcessor
        .process(vec![add_column.clone()], &source, &target)
        .expect("column add is supported in place");

    assert_eq!(executable, vec![add_column]);
}

#[test]
fn column_renames_and_drops_shape_the_copy_lists() {
    let source = model(vec![entity(
        "T",
        vec![property("A"), property("B"), property("C")],
    )]);
    let target = model(vec![entity("T", vec![property("A2"), property("C")])]);

    let executable = SqlitePreProcessor
        .process(
            vec![
                MigrationOperation::RenameColumn {
                    table: SchemaQualifiedName::bare("T"),
                    name: "A".to_string(),
                    new_name: "A2".to_string(),
                },
                MigrationOperation::DropColumn {
                    table: SchemaQualifiedName::bare("T"),
                    column: "B".to_string(),
                },
            ],
            &source,
            &target,
        )
        .expect("pre-processing should succeed");

    let copy = executable
        .iter()
        .find(|operation| operation.kind() == OperationKind::CopyData)
        .expect("a rebuild must copy the surviving rows");
    assert_eq!(
        copy,
        &MigrationOperation::CopyData {
            source: SchemaQualifiedName::bare("__mig_tmp__T"),
            source_columns: vec!["A".to_string(), "C".to_string()],
            target: SchemaQualifiedName::bare("T"),
            target_columns: vec!["A2".to_string(), "C".to_string()],
        }
    );
}

#[test]
fn renamed_table_rebuild_needs_no_temp_name() {
    let source = model(vec![entity("T", vec![property("A")])]);
    let target = model(vec![EntityType {
        primary_key: Some(relmig_core::Key {
            name: Some("PK_U".to_string()),
            properties: vec!["A".to_string()],
            clustered: None,
        }),
        ..entity("U", vec![property("A")])
    }]);

    let executable = SqlitePreProcessor
        .process(
            vec![
                MigrationOperation::RenameTable {
                    name: SchemaQualifiedName::bare("T"),
                    new_name: "U".to_string(),
                },
                MigrationOperation::AddPrimaryKey(relmig_core::PrimaryKeyDefinition {
                    table: SchemaQualifiedName::bare("U"),
                    name: "PK_U".to_string(),
                    columns: vec!["A".to_string()],
                    clustered: None,
                }),
            ],
            &source,
            &target,
        )
        .expect("pre-processing should succeed");

    // the new table is created directly under the target name and rows are
    // copied from the never-renamed source
    assert!(
        !executable
            .iter()
            .any(|operation| operation.kind() == OperationKind::RenameTable)
    );
    assert_eq!(
        executable.last(),
        Some(&MigrationOperation::DropTable {
            name: SchemaQualifiedName::bare("T"),
        })
    );
    assert!(executable.iter().any(|operation| matches!(
        operation,
        MigrationOperation::CopyData { source, .. } if source.name == "T"
    )));
}

#[test]
fn rename_index_expands_to_drop_and_create() {
    let source = model(vec![EntityType {
        indexes: vec![Index {
            name: Some("IX".to_string()),
            properties: vec!["A".to_string()],
            unique: false,
            clustered: None,
        }],
        ..entity("T", vec![property("A")])
    }]);
    let target = model(vec![EntityType {
        indexes: vec![Index {
            name: Some("IX2".to_string()),
            properties: vec!["A".to_string()],
            unique: false,
            clustered: None,
        }],
        ..entity("T", vec![property("A")])
    }]);

    let executable = SqlitePreProcessor
        .process(
            vec![MigrationOperation::RenameIndex {
                table: SchemaQualifiedName::bare("T"),
                name: "IX".to_string(),
                new_name: "IX2".to_string(),
            }],
            &source,
            &target,
        )
        .expect("pre-processing should succeed");

    assert_eq!(executable.len(), 2);
    assert_eq!(
        executable[0],
        MigrationOperation::DropIndex {
            table: SchemaQualifiedName::bare("T"),
            name: "IX".to_string(),
        }
    );
    assert!(matches!(
        &executable[1],
        MigrationOperation::CreateIndex(index) if index.name == "IX2"
    ));
}

#[test]
fn index_operations_force_pending_rebuilds_to_flush_first() {
    let source = model(vec![entity("T", vec![property("A")])]);
    let target = model(vec![EntityType {
        indexes: vec![Index {
            name: Some("IX".to_string()),
            properties: vec!["A".to_string()],
            unique: false,
            clustered: None,
        }],
        ..entity(
            "T",
            vec![Property {
                nullable: true,
                ..property("A")
            }],
        )
    }]);

    let executable = SqlitePreProcessor
        .process(
            vec![
                MigrationOperation::AlterColumn {
                    table: SchemaQualifiedName::bare("T"),
                    column: ColumnModel {
                        nullable: true,
                        ..column("A")
                    },
                },
                MigrationOperation::CreateIndex(relmig_core::IndexDefinition {
                    table: SchemaQualifiedName::bare("T"),
                    name: "IX".to_string(),
                    columns: vec!["A".to_string()],
                    unique: false,
                    clustered: None,
                }),
            ],
            &source,
            &target,
        )
        .expect("pre-processing should succeed");

    let kinds: Vec<_> = executable.iter().map(MigrationOperation::kind).collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::RenameTable,
            OperationKind::CreateTable,
            OperationKind::CopyData,
            OperationKind::CreateIndex,
            OperationKind::DropTable,
        ]
    );
}
