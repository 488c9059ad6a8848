use super::{DefaultValue, PrimitiveKind, SchemaQualifiedName};
use crate::names;

/// Immutable bundle of entity types and sequences describing one side of a
/// diff. Models are inputs only; the differ never mutates them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaModel {
    pub entity_types: Vec<EntityType>,
    pub sequences: Vec<Sequence>,
}

impl SchemaModel {
    #[must_use]
    pub fn new(entity_types: Vec<EntityType>, sequences: Vec<Sequence>) -> Self {
        Self {
            entity_types,
            sequences,
        }
    }

    #[must_use]
    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types.iter().find(|entity| entity.name == name)
    }

    /// Looks an entity type up by its resolved relational table name.
    #[must_use]
    pub fn entity_type_with_table(&self, table: &SchemaQualifiedName) -> Option<&EntityType> {
        self.entity_types
            .iter()
            .find(|entity| names::full_table_name(entity) == *table)
    }
}

/// One mapped type: a logical name, an optional relational table binding,
/// and the ordered property set with its keys and table subordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityType {
    pub name: String,
    pub table: Option<String>,
    pub schema: Option<String>,
    pub properties: Vec<Property>,
    pub primary_key: Option<Key>,
    pub alternate_keys: Vec<Key>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}

impl EntityType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            schema: None,
            properties: Vec::new(),
            primary_key: None,
            alternate_keys: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// True when the property participates in the primary key, an alternate
    /// key, or the dependent side of a foreign key.
    #[must_use]
    pub fn is_key_property(&self, name: &str) -> bool {
        let in_key = |key: &Key| key.properties.iter().any(|property| property == name);

        self.primary_key.as_ref().is_some_and(in_key)
            || self.alternate_keys.iter().any(in_key)
            || self
                .foreign_keys
                .iter()
                .any(|fk| fk.properties.iter().any(|property| property == name))
    }
}

/// Property ordering within an entity is stable and drives declaration
/// order in emitted DDL.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub kind: PrimitiveKind,
    pub nullable: bool,
    pub max_length: Option<u32>,
    pub concurrency_token: bool,
    pub generated_on_add: bool,
    pub store_computed: bool,
    pub column: Option<String>,
    pub storage_type: Option<String>,
    pub default_value: Option<DefaultValue>,
    pub default_sql: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            max_length: None,
            concurrency_token: false,
            generated_on_add: false,
            store_computed: false,
            column: None,
            storage_type: None,
            default_value: None,
            default_sql: None,
        }
    }
}

/// Primary or alternate key. `clustered` is left to the dialect when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub name: Option<String>,
    pub properties: Vec<String>,
    pub clustered: Option<bool>,
}

impl Key {
    pub fn on(properties: Vec<String>) -> Self {
        Self {
            name: None,
            properties,
            clustered: None,
        }
    }
}

/// References another entity type by logical name; the differ and factory
/// resolve the reference against the owning model, never via pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: Option<String>,
    pub properties: Vec<String>,
    pub referenced_entity: String,
    pub referenced_properties: Vec<String>,
    pub cascade_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub name: Option<String>,
    pub properties: Vec<String>,
    pub unique: bool,
    pub clustered: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub name: String,
    pub schema: Option<String>,
    pub start: i64,
    pub increment: i64,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub kind: PrimitiveKind,
}

impl Sequence {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            start: 0,
            increment: 1,
            min_value: None,
            max_value: None,
            kind: PrimitiveKind::Int64,
        }
    }
}
