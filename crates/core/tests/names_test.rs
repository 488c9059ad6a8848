use relmig_core::{
    EntityType, ForeignKey, Index, Key, PrimitiveKind, Property, SchemaQualifiedName, Sequence,
    names,
};

fn entity() -> EntityType {
    EntityType {
        table: Some("blog_posts".to_string()),
        schema: Some("content".to_string()),
        properties: vec![
            Property::new("Id", PrimitiveKind::Int32),
            Property {
                column: Some("author_id".to_string()),
                ..Property::new("AuthorId", PrimitiveKind::Int32)
            },
        ],
        ..EntityType::named("BlogPost")
    }
}

#[test]
fn explicit_table_binding_wins_over_the_logical_name() {
    let entity = entity();
    assert_eq!(names::table_name(&entity), "blog_posts");
    assert_eq!(names::table_schema(&entity).as_deref(), Some("content"));
    assert_eq!(
        names::full_table_name(&entity),
        SchemaQualifiedName::new("content", "blog_posts")
    );

    let bare = EntityType::named("Draft");
    assert_eq!(names::table_name(&bare), "Draft");
    assert_eq!(names::full_table_name(&bare), SchemaQualifiedName::bare("Draft"));
}

#[test]
fn column_name_falls_back_to_the_property_name() {
    let entity = entity();
    assert_eq!(names::column_name(&entity.properties[0]), "Id");
    assert_eq!(names::column_name(&entity.properties[1]), "author_id");
}

#[test]
fn key_names_synthesize_from_table_and_columns() {
    let entity = entity();
    let unnamed = Key {
        name: None,
        properties: vec!["Id".to_string()],
        clustered: None,
    };
    let named = Key {
        name: Some("MyPK".to_string()),
        ..unnamed.clone()
    };

    assert_eq!(names::key_name(&entity, &unnamed), "PK_blog_posts");
    assert_eq!(names::key_name(&entity, &named), "MyPK");

    let alternate = Key {
        name: None,
        properties: vec!["AuthorId".to_string()],
        clustered: None,
    };
    // synthesized names use resolved column names
    assert_eq!(
        names::alternate_key_name(&entity, &alternate),
        "AK_blog_posts_author_id"
    );
}

#[test]
fn foreign_key_name_includes_the_referenced_table() {
    let entity = entity();
    let referenced = EntityType {
        table: Some("users".to_string()),
        ..EntityType::named("User")
    };
    let foreign_key = ForeignKey {
        name: None,
        properties: vec!["AuthorId".to_string()],
        referenced_entity: "User".to_string(),
        referenced_properties: vec!["Id".to_string()],
        cascade_delete: false,
    };

    assert_eq!(
        names::foreign_key_name(&entity, &foreign_key, &referenced),
        "FK_blog_posts_users_author_id"
    );
}

#[test]
fn index_name_synthesizes_from_columns() {
    let entity = entity();
    let index = Index {
        name: None,
        properties: vec!["AuthorId".to_string(), "Id".to_string()],
        unique: false,
        clustered: None,
    };

    assert_eq!(names::index_name(&entity, &index), "IX_blog_posts_author_id_Id");
}

#[test]
fn sequence_names_round_trip() {
    let sequence = Sequence {
        schema: Some("dbo".to_string()),
        ..Sequence::named("OrderNumbers")
    };

    assert_eq!(names::sequence_name(&sequence), "OrderNumbers");
    assert_eq!(names::sequence_schema(&sequence).as_deref(), Some("dbo"));
    assert_eq!(
        names::full_sequence_name(&sequence),
        SchemaQualifiedName::new("dbo", "OrderNumbers")
    );
}
