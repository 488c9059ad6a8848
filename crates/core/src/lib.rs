mod cancel;
mod dialect;
mod differ;
mod error;
mod factory;
mod generator;
mod model;
pub mod names;
mod operations;
mod preprocess;
mod type_mapper;

pub use cancel::CancellationToken;
pub use dialect::{Dialect, plan_migration_with};
pub use differ::{
    DEFAULT_FUZZY_MATCH_THRESHOLD, DiffOptions, ModelDiffer, TEMP_NAME_PREFIX,
    equivalent_properties,
};
pub use error::{ChangeTrackerError, Error, MigrationError, Result};
pub use factory::OperationFactory;
pub use generator::{SqlGenerator, SqlHelper, SqlStatement, unsupported_operation};
pub use model::{
    DefaultValue, EntityType, ForeignKey, Index, Key, PrimitiveKind, Property, SchemaModel,
    SchemaQualifiedName, Sequence,
};
pub use operations::{
    ColumnModel, ForeignKeyDefinition, IndexDefinition, MigrationOperation,
    MigrationOperationCollection, OperationKind, PrimaryKeyDefinition, TableDefinition,
    UniqueConstraintDefinition,
};
pub use preprocess::{GenericPreProcessor, OperationPreProcessor};
pub use type_mapper::TypeMapper;
