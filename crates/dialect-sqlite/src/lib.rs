mod generator;
mod preprocess;
mod type_mapper;

pub use generator::SqliteGenerator;
pub use preprocess::SqlitePreProcessor;
pub use type_mapper::SqliteTypeMapper;

use relmig_core::{Dialect, OperationPreProcessor, SqlGenerator, TypeMapper};

const DIALECT_NAME: &str = "sqlite";

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &str {
        DIALECT_NAME
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        &SqliteTypeMapper
    }

    fn pre_processor(&self) -> &dyn OperationPreProcessor {
        &SqlitePreProcessor
    }

    fn sql_generator(&self) -> &dyn SqlGenerator {
        &SqliteGenerator
    }
}
