use crate::differ::ModelDiffer;
use crate::error::Result;
use crate::generator::SqlGenerator;
use crate::model::SchemaModel;
use crate::preprocess::OperationPreProcessor;
use crate::type_mapper::TypeMapper;

/// Everything a dialect contributes to the migration pipeline: its storage
/// type mapping, operation pre-processing, and SQL generation.
///
/// Contract requirements:
/// - Pre-processing and generation fail fast with typed errors; unsupported
///   operations are never silently skipped.
/// - The differ stays dialect-agnostic apart from the type mapper: dialects
///   rewrite and render the operation stream, they do not re-diff it.
pub trait Dialect {
    fn name(&self) -> &str;
    fn type_mapper(&self) -> &dyn TypeMapper;
    fn pre_processor(&self) -> &dyn OperationPreProcessor;
    fn sql_generator(&self) -> &dyn SqlGenerator;
}

/// Runs the full diff → pre-process → generate pipeline for one dialect and
/// returns the ordered SQL statements.
pub fn plan_migration_with(
    dialect: &dyn Dialect,
    source: &SchemaModel,
    target: &SchemaModel,
) -> Result<Vec<String>> {
    let differ = ModelDiffer::new(dialect.type_mapper());
    let operations = differ.diff(source, target);
    let executable = dialect.pre_processor().process(operations, source, target)?;
    let statements = dialect.sql_generator().generate_ddl(&executable)?;
    Ok(statements
        .into_iter()
        .map(|statement| statement.sql)
        .collect())
}
