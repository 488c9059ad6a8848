#[path = "support/fake_type_mapper.rs"]
mod fake_type_mapper;

use fake_type_mapper::FakeTypeMapper;
use relmig_core::{
    EntityType, ForeignKey, Key, MigrationOperation, OperationFactory, PrimitiveKind, Property,
    SchemaModel, SchemaQualifiedName, Sequence,
};

fn entity_with_key_text() -> EntityType {
    EntityType {
        properties: vec![
            Property::new("Code", PrimitiveKind::Text),
            Property::new("Label", PrimitiveKind::Text),
        ],
        primary_key: Some(Key {
            name: None,
            properties: vec!["Code".to_string()],
            clustered: None,
        }),
        ..EntityType::named("Tag")
    }
}

#[test]
fn column_model_resolves_key_role_through_the_mapper() {
    let mapper = FakeTypeMapper;
    let factory = OperationFactory::new(&mapper);
    let entity = entity_with_key_text();

    let key_column = factory.column_model(&entity, &entity.properties[0]);
    let plain_column = factory.column_model(&entity, &entity.properties[1]);

    assert_eq!(key_column.storage_type, "varchar(128)");
    assert_eq!(plain_column.storage_type, "varchar");
}

#[test]
fn explicit_storage_type_override_wins_over_the_mapper() {
    let mapper = FakeTypeMapper;
    let factory = OperationFactory::new(&mapper);
    let entity = EntityType {
        properties: vec![Property {
            storage_type: Some("char(8)".to_string()),
            ..Property::new("Code", PrimitiveKind::Text)
        }],
        ..EntityType::named("Tag")
    };

    let column = factory.column_model(&entity, &entity.properties[0]);
    assert_eq!(column.storage_type, "char(8)");
}

#[test]
fn rename_column_takes_table_old_then_new() {
    let mapper = FakeTypeMapper;
    let factory = OperationFactory::new(&mapper);

    let operation = factory.rename_column(SchemaQualifiedName::bare("T"), "Old", "New");

    assert_eq!(
        operation,
        MigrationOperation::RenameColumn {
            table: SchemaQualifiedName::bare("T"),
            name: "Old".to_string(),
            new_name: "New".to_string(),
        }
    );
}

#[test]
fn foreign_key_definition_carries_the_cascade_policy() {
    let mapper = FakeTypeMapper;
    let factory = OperationFactory::new(&mapper);

    let referenced = EntityType {
        properties: vec![Property::new("Id", PrimitiveKind::Int32)],
        ..EntityType::named("Parent")
    };
    let entity = EntityType {
        properties: vec![Property::new("ParentId", PrimitiveKind::Int32)],
        ..EntityType::named("Child")
    };
    let foreign_key = ForeignKey {
        name: Some("MyFK".to_string()),
        properties: vec!["ParentId".to_string()],
        referenced_entity: "Parent".to_string(),
        referenced_properties: vec!["Id".to_string()],
        cascade_delete: true,
    };

    let definition = factory.foreign_key_definition(&entity, &foreign_key, &referenced);

    assert!(definition.cascade_delete);
    assert_eq!(definition.name, "MyFK");
    assert_eq!(definition.referenced_table, SchemaQualifiedName::bare("Parent"));
}

#[test]
fn create_table_skips_foreign_keys_with_unknown_principals() {
    let mapper = FakeTypeMapper;
    let factory = OperationFactory::new(&mapper);

    let entity = EntityType {
        properties: vec![Property::new("OwnerId", PrimitiveKind::Int32)],
        foreign_keys: vec![ForeignKey {
            name: None,
            properties: vec!["OwnerId".to_string()],
            referenced_entity: "Missing".to_string(),
            referenced_properties: vec!["Id".to_string()],
            cascade_delete: false,
        }],
        ..EntityType::named("Orphan")
    };
    let model = SchemaModel::new(vec![entity.clone()], Vec::new());

    let table = factory.create_table(&model, &entity);

    assert!(table.foreign_keys.is_empty());
    assert_eq!(table.columns.len(), 1);
}

#[test]
fn create_sequence_resolves_its_storage_type() {
    let mapper = FakeTypeMapper;
    let factory = OperationFactory::new(&mapper);

    let operation = factory.create_sequence(&Sequence {
        schema: Some("dbo".to_string()),
        start: 5,
        ..Sequence::named("Numbers")
    });

    assert_eq!(
        operation,
        MigrationOperation::CreateSequence {
            name: SchemaQualifiedName::new("dbo", "Numbers"),
            storage_type: "bigint".to_string(),
            start: 5,
            increment: 1,
            min_value: None,
            max_value: None,
        }
    );
}
