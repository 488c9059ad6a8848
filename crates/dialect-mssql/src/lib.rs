mod generator;
mod type_mapper;

pub use generator::SqlServerGenerator;
pub use type_mapper::SqlServerTypeMapper;

use relmig_core::{Dialect, GenericPreProcessor, OperationPreProcessor, SqlGenerator, TypeMapper};

const DIALECT_NAME: &str = "mssql";

/// SQL Server can alter table subordinates in place, so the generic
/// pass-through pre-processor is all it needs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn name(&self) -> &str {
        DIALECT_NAME
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        &SqlServerTypeMapper
    }

    fn pre_processor(&self) -> &dyn OperationPreProcessor {
        &GenericPreProcessor
    }

    fn sql_generator(&self) -> &dyn SqlGenerator {
        &SqlServerGenerator
    }
}
