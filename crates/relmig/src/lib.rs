//! Facade over the relmig pipeline: pick a dialect selector, get the
//! ordered SQL statements that evolve one schema model into another.
//!
//! The heavy lifting lives in `relmig-core` (model, differ, contracts) and
//! the per-dialect crates; everything a typical host needs is re-exported
//! here, with each dialect behind a cargo feature.

pub use relmig_core::{
    CancellationToken, ChangeTrackerError, ColumnModel, DEFAULT_FUZZY_MATCH_THRESHOLD,
    DefaultValue, Dialect, DiffOptions, EntityType, Error, ForeignKey, ForeignKeyDefinition, Index,
    IndexDefinition, Key, MigrationError, MigrationOperation, MigrationOperationCollection,
    ModelDiffer, OperationFactory, OperationKind, OperationPreProcessor, PrimaryKeyDefinition,
    PrimitiveKind, Property, Result, SchemaModel, SchemaQualifiedName, Sequence, SqlGenerator,
    SqlHelper, SqlStatement, TableDefinition, TypeMapper, UniqueConstraintDefinition,
    plan_migration_with,
};

#[cfg(feature = "sqlserver")]
pub use relmig_dialect_mssql::SqlServerDialect;
#[cfg(feature = "sqlite")]
pub use relmig_dialect_sqlite::SqliteDialect;

/// Built-in dialect selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectKind {
    #[cfg(feature = "sqlserver")]
    SqlServer,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

/// Diffs `source` against `target` and renders the executable statement
/// sequence for the selected dialect.
pub fn plan_migration(
    source: &SchemaModel,
    target: &SchemaModel,
    dialect: DialectKind,
) -> Result<Vec<String>> {
    match dialect {
        #[cfg(feature = "sqlserver")]
        DialectKind::SqlServer => plan_migration_with(&SqlServerDialect, source, target),
        #[cfg(feature = "sqlite")]
        DialectKind::Sqlite => plan_migration_with(&SqliteDialect, source, target),
    }
}
