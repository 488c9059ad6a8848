//! Canonical name derivation for relational objects.
//!
//! Explicit names supplied by the model always win; otherwise names are
//! synthesized from the owning entity and the participating column list.
//! Every function here is pure.

use crate::model::{EntityType, ForeignKey, Index, Key, Property, SchemaQualifiedName, Sequence};

#[must_use]
pub fn table_name(entity: &EntityType) -> String {
    entity.table.clone().unwrap_or_else(|| entity.name.clone())
}

#[must_use]
pub fn table_schema(entity: &EntityType) -> Option<String> {
    entity.schema.clone()
}

#[must_use]
pub fn full_table_name(entity: &EntityType) -> SchemaQualifiedName {
    SchemaQualifiedName {
        schema: table_schema(entity),
        name: table_name(entity),
    }
}

#[must_use]
pub fn column_name(property: &Property) -> String {
    property
        .column
        .clone()
        .unwrap_or_else(|| property.name.clone())
}

/// Primary key name: explicit, or `PK_<Table>`.
#[must_use]
pub fn key_name(entity: &EntityType, key: &Key) -> String {
    if let Some(name) = &key.name {
        return name.clone();
    }
    format!("PK_{}", table_name(entity))
}

/// Alternate key name: explicit, or `AK_<Table>_<Cols>`.
#[must_use]
pub fn alternate_key_name(entity: &EntityType, key: &Key) -> String {
    if let Some(name) = &key.name {
        return name.clone();
    }
    format!(
        "AK_{}_{}",
        table_name(entity),
        column_part(entity, &key.properties)
    )
}

/// Foreign key name: explicit, or `FK_<Table>_<Ref>_<Cols>`.
#[must_use]
pub fn foreign_key_name(
    entity: &EntityType,
    foreign_key: &ForeignKey,
    referenced: &EntityType,
) -> String {
    if let Some(name) = &foreign_key.name {
        return name.clone();
    }
    format!(
        "FK_{}_{}_{}",
        table_name(entity),
        table_name(referenced),
        column_part(entity, &foreign_key.properties)
    )
}

/// Index name: explicit, or `IX_<Table>_<Cols>`.
#[must_use]
pub fn index_name(entity: &EntityType, index: &Index) -> String {
    if let Some(name) = &index.name {
        return name.clone();
    }
    format!(
        "IX_{}_{}",
        table_name(entity),
        column_part(entity, &index.properties)
    )
}

#[must_use]
pub fn sequence_name(sequence: &Sequence) -> String {
    sequence.name.clone()
}

#[must_use]
pub fn sequence_schema(sequence: &Sequence) -> Option<String> {
    sequence.schema.clone()
}

#[must_use]
pub fn full_sequence_name(sequence: &Sequence) -> SchemaQualifiedName {
    SchemaQualifiedName {
        schema: sequence_schema(sequence),
        name: sequence_name(sequence),
    }
}

fn column_part(entity: &EntityType, properties: &[String]) -> String {
    properties
        .iter()
        .map(|name| {
            entity
                .property(name)
                .map_or_else(|| name.clone(), column_name)
        })
        .collect::<Vec<_>>()
        .join("_")
}
