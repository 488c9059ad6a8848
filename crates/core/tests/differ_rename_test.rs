use std::collections::BTreeSet;

#[path = "support/fake_type_mapper.rs"]
mod fake_type_mapper;

use fake_type_mapper::FakeTypeMapper;
use relmig_core::{
    EntityType, Index, MigrationOperation, ModelDiffer, PrimitiveKind, Property, SchemaModel,
    SchemaQualifiedName, TEMP_NAME_PREFIX,
};

fn property(name: &str, kind: PrimitiveKind) -> Property {
    Property::new(name, kind)
}

fn entity_with_table(name: &str, table: &str, properties: Vec<Property>) -> EntityType {
    EntityType {
        table: Some(table.to_string()),
        properties,
        ..EntityType::named(name)
    }
}

fn model(entity_types: Vec<EntityType>) -> SchemaModel {
    SchemaModel::new(entity_types, Vec::new())
}

/// Applies table renames to a set of live names, asserting that every
/// intermediate step keeps names unique.
fn simulate_table_renames(operations: &[MigrationOperation], initial: &[&str]) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = initial.iter().map(|name| (*name).to_string()).collect();
    for operation in operations {
        if let MigrationOperation::RenameTable { name, new_name } = operation {
            assert!(
                names.remove(&name.name),
                "rename source `{}` must exist",
                name.name
            );
            assert!(
                names.insert(new_name.clone()),
                "rename target `{new_name}` must be free"
            );
        }
    }
    names
}

#[test]
fn table_rename_cycle_routes_through_a_temp_name() {
    let mapper = FakeTypeMapper;
    let differ = ModelDiffer::new(&mapper);

    let first = vec![property("A", PrimitiveKind::Int32)];
    let second = vec![property("B", PrimitiveKind::Text)];

    let source = model(vec![
        entity_with_table("E1", "T1", first.clone()),
        entity_with_table("E2", "T2", second.clone()),
    ]);
    let target = model(vec![
        entity_with_table("E1", "T2", first),
        entity_with_table("E2", "T1", second),
    ]);

    let operations = differ.diff(&source, &target);

    let renames: Vec<_> = operations
        .iter()
        .filter(|operation| matches!(operation, MigrationOperation::RenameTable { .. }))
        .collect();
    assert_eq!(renames.len(), 3, "a 2-cycle needs one temp rename");
    assert!(renames.iter().any(|operation| matches!(
        operation,
        MigrationOperation::RenameTable { new_name, .. } if new_name.starts_with(TEMP_NAME_PREFIX)
    )));

    let final_names = simulate_table_renames(&operations, &["T1", "T2"]);
    assert_eq!(
        final_names,
        ["T1", "T2"].iter().map(|s| (*s).to_string()).collect()
    );
}

#[test]
fn overlapping_rename_chain_is_broken_with_a_temp_name() {
    let mapper = FakeTypeMapper;
    let differ = ModelDiffer::new(&mapper);

    let first = vec![property("A", PrimitiveKind::Int32)];
    let second = vec![property("B", PrimitiveKind::Text)];

    let source = model(vec![
        entity_with_table("E1", "A", first.clone()),
        entity_with_table("E2", "B", second.clone()),
    ]);
    let target = model(vec![
        entity_with_table("E1", "B", first),
        entity_with_table("E2", "C", second),
    ]);

    let operations = differ.diff(&source, &target);
    let final_names = simulate_table_renames(&operations, &["A", "B"]);

    assert_eq!(
        final_names,
        ["B", "C"].iter().map(|s| (*s).to_string()).collect()
    );
}

#[test]
fn column_rename_cycle_routes_through_a_temp_name() {
    let mapper = FakeTypeMapper;
    let differ = ModelDiffer::new(&mapper);

    let source = model(vec![EntityType {
        properties: vec![
            Property {
                column: Some("a".to_string()),
                ..property("P1", PrimitiveKind::Int32)
            },
            Property {
                column: Some("b".to_string()),
                ..property("P2", PrimitiveKind::Int32)
            },
        ],
        ..EntityType::named("T")
    }]);
    let target = model(vec![EntityType {
        properties: vec![
            Property {
                column: Some("b".to_string()),
                ..property("P1", PrimitiveKind::Int32)
            },
            Property {
                column: Some("a".to_string()),
                ..property("P2", PrimitiveKind::Int32)
            },
        ],
        ..EntityType::named("T")
    }]);

    let operations = differ.diff(&source, &target);
    let table = SchemaQualifiedName::bare("T");

    assert_eq!(
        operations,
        vec![
            MigrationOperation::RenameColumn {
                table: table.clone(),
                name: "a".to_string(),
                new_name: format!("{TEMP_NAME_PREFIX}0"),
            },
            MigrationOperation::RenameColumn {
                table: table.clone(),
                name: "b".to_string(),
                new_name: "a".to_string(),
            },
            MigrationOperation::RenameColumn {
                table,
                name: format!("{TEMP_NAME_PREFIX}0"),
                new_name: "b".to_string(),
            },
        ]
    );
}

#[test]
fn equivalent_index_with_a_new_name_is_renamed() {
    let mapper = FakeTypeMapper;
    let differ = ModelDiffer::new(&mapper);

    let source = model(vec![EntityType {
        properties: vec![property("X", PrimitiveKind::Int32)],
        indexes: vec![Index {
            name: Some("IX_Old".to_string()),
            properties: vec!["X".to_string()],
            unique: true,
            clustered: None,
        }],
        ..EntityType::named("T")
    }]);
    let target = model(vec![EntityType {
        properties: vec![property("X", PrimitiveKind::Int32)],
        indexes: vec![Index {
            name: Some("IX_New".to_string()),
            properties: vec!["X".to_string()],
            unique: true,
            clustered: None,
        }],
        ..EntityType::named("T")
    }]);

    assert_eq!(
        differ.diff(&source, &target),
        vec![MigrationOperation::RenameIndex {
            table: SchemaQualifiedName::bare("T"),
            name: "IX_Old".to_string(),
            new_name: "IX_New".to_string(),
        }]
    );
}
