mod collection;
mod op;

pub use collection::MigrationOperationCollection;
pub use op::{
    ColumnModel, ForeignKeyDefinition, IndexDefinition, MigrationOperation, OperationKind,
    PrimaryKeyDefinition, TableDefinition, UniqueConstraintDefinition,
};
