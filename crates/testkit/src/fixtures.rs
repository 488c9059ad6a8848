//! Hand-rolled model fixtures for dialect and core tests.

use relmig_core::{
    EntityType, ForeignKey, Index, Key, PrimitiveKind, Property, SchemaModel, Sequence,
};

pub fn model(entity_types: Vec<EntityType>) -> SchemaModel {
    SchemaModel::new(entity_types, Vec::new())
}

pub fn model_with_sequences(
    entity_types: Vec<EntityType>,
    sequences: Vec<Sequence>,
) -> SchemaModel {
    SchemaModel::new(entity_types, sequences)
}

pub fn entity(name: &str, properties: Vec<Property>) -> EntityType {
    EntityType {
        properties,
        ..EntityType::named(name)
    }
}

pub fn entity_in_schema(schema: &str, name: &str, properties: Vec<Property>) -> EntityType {
    EntityType {
        schema: Some(schema.to_string()),
        properties,
        ..EntityType::named(name)
    }
}

pub fn property(name: &str, kind: PrimitiveKind) -> Property {
    Property::new(name, kind)
}

pub fn nullable_property(name: &str, kind: PrimitiveKind) -> Property {
    Property {
        nullable: true,
        ..Property::new(name, kind)
    }
}

pub fn primary_key(name: Option<&str>, properties: &[&str]) -> Key {
    Key {
        name: name.map(str::to_string),
        properties: strings(properties),
        clustered: None,
    }
}

pub fn foreign_key(
    name: Option<&str>,
    properties: &[&str],
    referenced_entity: &str,
    referenced_properties: &[&str],
) -> ForeignKey {
    ForeignKey {
        name: name.map(str::to_string),
        properties: strings(properties),
        referenced_entity: referenced_entity.to_string(),
        referenced_properties: strings(referenced_properties),
        cascade_delete: false,
    }
}

pub fn index(name: Option<&str>, properties: &[&str], unique: bool) -> Index {
    Index {
        name: name.map(str::to_string),
        properties: strings(properties),
        unique,
        clustered: None,
    }
}

pub fn sequence(schema: Option<&str>, name: &str) -> Sequence {
    Sequence {
        schema: schema.map(str::to_string),
        ..Sequence::named(name)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
