use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use relmig_core::{
    DefaultValue, Dialect, EntityType, ForeignKey, Index, Key, PrimitiveKind, Property,
    SchemaModel, Sequence, plan_migration_with,
};

/// One conformance scenario: a source and a target model plus the exact SQL
/// statements (or the error fragment) the pipeline must produce.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub source: ModelSpec,
    pub target: ModelSpec,
    pub expect_sql: Vec<String>,
    pub expect_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSpec {
    pub entities: Vec<EntitySpec>,
    pub sequences: Vec<SequenceSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySpec {
    pub name: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
    #[serde(default)]
    pub primary_key: Option<KeySpec>,
    #[serde(default)]
    pub alternate_keys: Vec<KeySpec>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeySpec>,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertySpec {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub default: Option<DefaultSpec>,
    #[serde(default)]
    pub default_sql: Option<String>,
    #[serde(default)]
    pub generated_on_add: bool,
    #[serde(default)]
    pub concurrency_token: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultSpec {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeySpec {
    pub name: Option<String>,
    pub properties: Vec<String>,
    pub clustered: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeySpec {
    #[serde(default)]
    pub name: Option<String>,
    pub properties: Vec<String>,
    pub references: String,
    pub referenced_properties: Vec<String>,
    #[serde(default)]
    pub cascade_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub properties: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequenceSpec {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub start: i64,
    #[serde(default = "default_increment")]
    pub increment: i64,
    #[serde(default = "default_sequence_kind")]
    pub kind: String,
}

fn default_increment() -> i64 {
    1
}

fn default_sequence_kind() -> String {
    "int64".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecError {
    message: String,
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scenario spec error: {}", self.message)
    }
}

impl std::error::Error for SpecError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioResult {
    Passed,
    Failed(String),
}

pub fn load_scenarios(yaml: &str) -> Result<BTreeMap<String, Scenario>, SpecError> {
    serde_yaml::from_str(yaml).map_err(|error| SpecError {
        message: error.to_string(),
    })
}

/// Runs one scenario through the full pipeline and compares statements
/// verbatim; an expected error matches on substring.
pub fn run_scenario(dialect: &dyn Dialect, scenario: &Scenario) -> ScenarioResult {
    let source = match build_model(&scenario.source) {
        Ok(model) => model,
        Err(error) => return ScenarioResult::Failed(error.to_string()),
    };
    let target = match build_model(&scenario.target) {
        Ok(model) => model,
        Err(error) => return ScenarioResult::Failed(error.to_string()),
    };

    match plan_migration_with(dialect, &source, &target) {
        Ok(statements) => {
            if let Some(expected) = &scenario.expect_error {
                return ScenarioResult::Failed(format!(
                    "expected error containing `{expected}`, got {} statements",
                    statements.len()
                ));
            }
            if statements == scenario.expect_sql {
                ScenarioResult::Passed
            } else {
                ScenarioResult::Failed(format!(
                    "statement mismatch:\n  expected: {:?}\n  actual:   {:?}",
                    scenario.expect_sql, statements
                ))
            }
        }
        Err(error) => match &scenario.expect_error {
            Some(expected) if error.to_string().contains(expected.as_str()) => {
                ScenarioResult::Passed
            }
            Some(expected) => ScenarioResult::Failed(format!(
                "expected error containing `{expected}`, got `{error}`"
            )),
            None => ScenarioResult::Failed(error.to_string()),
        },
    }
}

pub fn build_model(spec: &ModelSpec) -> Result<SchemaModel, SpecError> {
    let entity_types = spec
        .entities
        .iter()
        .map(build_entity)
        .collect::<Result<Vec<_>, _>>()?;
    let sequences = spec
        .sequences
        .iter()
        .map(build_sequence)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SchemaModel::new(entity_types, sequences))
}

fn build_entity(spec: &EntitySpec) -> Result<EntityType, SpecError> {
    Ok(EntityType {
        name: spec.name.clone(),
        table: spec.table.clone(),
        schema: spec.schema.clone(),
        properties: spec
            .properties
            .iter()
            .map(build_property)
            .collect::<Result<Vec<_>, _>>()?,
        primary_key: spec.primary_key.as_ref().map(build_key),
        alternate_keys: spec.alternate_keys.iter().map(build_key).collect(),
        foreign_keys: spec.foreign_keys.iter().map(build_foreign_key).collect(),
        indexes: spec.indexes.iter().map(build_index).collect(),
    })
}

fn build_property(spec: &PropertySpec) -> Result<Property, SpecError> {
    Ok(Property {
        nullable: spec.nullable,
        max_length: spec.max_length,
        concurrency_token: spec.concurrency_token,
        generated_on_add: spec.generated_on_add,
        column: spec.column.clone(),
        default_value: spec.default.as_ref().map(build_default),
        default_sql: spec.default_sql.clone(),
        ..Property::new(spec.name.clone(), primitive_kind(&spec.kind)?)
    })
}

fn build_default(spec: &DefaultSpec) -> DefaultValue {
    match spec {
        DefaultSpec::Bool(value) => DefaultValue::Bool(*value),
        DefaultSpec::Integer(value) => DefaultValue::Integer(*value),
        DefaultSpec::Float(value) => DefaultValue::Float(*value),
        DefaultSpec::Text(value) => DefaultValue::Text(value.clone()),
    }
}

fn build_key(spec: &KeySpec) -> Key {
    Key {
        name: spec.name.clone(),
        properties: spec.properties.clone(),
        clustered: spec.clustered,
    }
}

fn build_foreign_key(spec: &ForeignKeySpec) -> ForeignKey {
    ForeignKey {
        name: spec.name.clone(),
        properties: spec.properties.clone(),
        referenced_entity: spec.references.clone(),
        referenced_properties: spec.referenced_properties.clone(),
        cascade_delete: spec.cascade_delete,
    }
}

fn build_index(spec: &IndexSpec) -> Index {
    Index {
        name: spec.name.clone(),
        properties: spec.properties.clone(),
        unique: spec.unique,
        clustered: None,
    }
}

fn build_sequence(spec: &SequenceSpec) -> Result<Sequence, SpecError> {
    Ok(Sequence {
        name: spec.name.clone(),
        schema: spec.schema.clone(),
        start: spec.start,
        increment: spec.increment,
        min_value: None,
        max_value: None,
        kind: primitive_kind(&spec.kind)?,
    })
}

fn primitive_kind(name: &str) -> Result<PrimitiveKind, SpecError> {
    let kind = match name.to_ascii_lowercase().as_str() {
        "bool" => PrimitiveKind::Bool,
        "byte" => PrimitiveKind::Byte,
        "sbyte" => PrimitiveKind::SByte,
        "int16" => PrimitiveKind::Int16,
        "uint16" => PrimitiveKind::UInt16,
        "int32" => PrimitiveKind::Int32,
        "uint32" => PrimitiveKind::UInt32,
        "int64" => PrimitiveKind::Int64,
        "uint64" => PrimitiveKind::UInt64,
        "char" => PrimitiveKind::Char,
        "float32" => PrimitiveKind::Float32,
        "float64" => PrimitiveKind::Float64,
        "decimal" => PrimitiveKind::Decimal,
        "text" | "string" => PrimitiveKind::Text,
        "binary" | "bytes" => PrimitiveKind::Binary,
        "datetime" => PrimitiveKind::DateTime,
        "datetimeoffset" => PrimitiveKind::DateTimeOffset,
        "timespan" => PrimitiveKind::TimeSpan,
        "guid" => PrimitiveKind::Guid,
        other => {
            return Err(SpecError {
                message: format!("unknown primitive kind `{other}`"),
            });
        }
    };
    Ok(kind)
}
