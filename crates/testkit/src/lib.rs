mod fixtures;
mod yaml_runner;

pub use fixtures::{
    entity, entity_in_schema, foreign_key, index, model, model_with_sequences, nullable_property,
    primary_key, property, sequence,
};
pub use yaml_runner::{
    DefaultSpec, EntitySpec, ForeignKeySpec, IndexSpec, KeySpec, ModelSpec, PropertySpec, Scenario,
    ScenarioResult, SequenceSpec, SpecError, build_model, load_scenarios, run_scenario,
};
