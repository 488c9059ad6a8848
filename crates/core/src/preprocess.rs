use crate::error::Result;
use crate::model::SchemaModel;
use crate::operations::MigrationOperation;

/// Rewrites a logical operation stream into a dialect-executable one.
///
/// Every input operation maps to zero or more output operations; nothing is
/// silently lost except foreign keys already inlined in a `CreateTable`.
/// The output is a valid linear plan: no operation references a name that
/// does not exist at that point.
pub trait OperationPreProcessor {
    fn process(
        &self,
        operations: Vec<MigrationOperation>,
        source: &SchemaModel,
        target: &SchemaModel,
    ) -> Result<Vec<MigrationOperation>>;
}

/// Pass-through pre-processing for dialects that can alter table
/// subordinates in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericPreProcessor;

impl OperationPreProcessor for GenericPreProcessor {
    fn process(
        &self,
        operations: Vec<MigrationOperation>,
        _source: &SchemaModel,
        _target: &SchemaModel,
    ) -> Result<Vec<MigrationOperation>> {
        Ok(operations)
    }
}
