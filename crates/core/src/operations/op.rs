use crate::model::{DefaultValue, PrimitiveKind, SchemaQualifiedName};

/// A single relational-DDL instruction.
///
/// Operations are value-typed and immutable once constructed: every name
/// and literal they need is snapshotted at construction time, so no
/// operation references live model metadata after `diff` returns.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOperation {
    CreateDatabase {
        name: String,
    },
    DropDatabase {
        name: String,
    },
    CreateSequence {
        name: SchemaQualifiedName,
        storage_type: String,
        start: i64,
        increment: i64,
        min_value: Option<i64>,
        max_value: Option<i64>,
    },
    DropSequence {
        name: SchemaQualifiedName,
    },
    MoveSequence {
        name: SchemaQualifiedName,
        new_schema: String,
    },
    RenameSequence {
        name: SchemaQualifiedName,
        new_name: String,
    },
    AlterSequence {
        name: SchemaQualifiedName,
        increment: i64,
    },
    CreateTable(TableDefinition),
    DropTable {
        name: SchemaQualifiedName,
    },
    RenameTable {
        name: SchemaQualifiedName,
        new_name: String,
    },
    MoveTable {
        name: SchemaQualifiedName,
        new_schema: String,
    },
    AddColumn {
        table: SchemaQualifiedName,
        column: ColumnModel,
    },
    DropColumn {
        table: SchemaQualifiedName,
        column: String,
    },
    AlterColumn {
        table: SchemaQualifiedName,
        column: ColumnModel,
    },
    AddDefaultConstraint {
        table: SchemaQualifiedName,
        column: String,
        value: Option<DefaultValue>,
        sql: Option<String>,
    },
    DropDefaultConstraint {
        table: SchemaQualifiedName,
        column: String,
    },
    RenameColumn {
        table: SchemaQualifiedName,
        name: String,
        new_name: String,
    },
    AddPrimaryKey(PrimaryKeyDefinition),
    DropPrimaryKey {
        table: SchemaQualifiedName,
        name: String,
    },
    AddUniqueConstraint(UniqueConstraintDefinition),
    DropUniqueConstraint {
        table: SchemaQualifiedName,
        name: String,
    },
    AddForeignKey(ForeignKeyDefinition),
    DropForeignKey {
        table: SchemaQualifiedName,
        name: String,
    },
    CreateIndex(IndexDefinition),
    DropIndex {
        table: SchemaQualifiedName,
        name: String,
    },
    RenameIndex {
        table: SchemaQualifiedName,
        name: String,
        new_name: String,
    },
    /// Internal to the SQLite rebuild-table protocol: copies the surviving
    /// rows from the renamed-aside table into the recreated one.
    CopyData {
        source: SchemaQualifiedName,
        source_columns: Vec<String>,
        target: SchemaQualifiedName,
        target_columns: Vec<String>,
    },
}

impl MigrationOperation {
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::CreateDatabase { .. } => OperationKind::CreateDatabase,
            Self::DropDatabase { .. } => OperationKind::DropDatabase,
            Self::CreateSequence { .. } => OperationKind::CreateSequence,
            Self::DropSequence { .. } => OperationKind::DropSequence,
            Self::MoveSequence { .. } => OperationKind::MoveSequence,
            Self::RenameSequence { .. } => OperationKind::RenameSequence,
            Self::AlterSequence { .. } => OperationKind::AlterSequence,
            Self::CreateTable(_) => OperationKind::CreateTable,
            Self::DropTable { .. } => OperationKind::DropTable,
            Self::RenameTable { .. } => OperationKind::RenameTable,
            Self::MoveTable { .. } => OperationKind::MoveTable,
            Self::AddColumn { .. } => OperationKind::AddColumn,
            Self::DropColumn { .. } => OperationKind::DropColumn,
            Self::AlterColumn { .. } => OperationKind::AlterColumn,
            Self::AddDefaultConstraint { .. } => OperationKind::AddDefaultConstraint,
            Self::DropDefaultConstraint { .. } => OperationKind::DropDefaultConstraint,
            Self::RenameColumn { .. } => OperationKind::RenameColumn,
            Self::AddPrimaryKey(_) => OperationKind::AddPrimaryKey,
            Self::DropPrimaryKey { .. } => OperationKind::DropPrimaryKey,
            Self::AddUniqueConstraint(_) => OperationKind::AddUniqueConstraint,
            Self::DropUniqueConstraint { .. } => OperationKind::DropUniqueConstraint,
            Self::AddForeignKey(_) => OperationKind::AddForeignKey,
            Self::DropForeignKey { .. } => OperationKind::DropForeignKey,
            Self::CreateIndex(_) => OperationKind::CreateIndex,
            Self::DropIndex { .. } => OperationKind::DropIndex,
            Self::RenameIndex { .. } => OperationKind::RenameIndex,
            Self::CopyData { .. } => OperationKind::CopyData,
        }
    }

    /// The table a table-scoped operation targets, `None` for database and
    /// sequence operations.
    #[must_use]
    pub const fn table(&self) -> Option<&SchemaQualifiedName> {
        match self {
            Self::CreateTable(table) => Some(&table.name),
            Self::DropTable { name }
            | Self::RenameTable { name, .. }
            | Self::MoveTable { name, .. } => Some(name),
            Self::AddColumn { table, .. }
            | Self::DropColumn { table, .. }
            | Self::AlterColumn { table, .. }
            | Self::AddDefaultConstraint { table, .. }
            | Self::DropDefaultConstraint { table, .. }
            | Self::RenameColumn { table, .. }
            | Self::DropPrimaryKey { table, .. }
            | Self::DropUniqueConstraint { table, .. }
            | Self::DropForeignKey { table, .. }
            | Self::DropIndex { table, .. }
            | Self::RenameIndex { table, .. } => Some(table),
            Self::AddPrimaryKey(pk) => Some(&pk.table),
            Self::AddUniqueConstraint(unique) => Some(&unique.table),
            Self::AddForeignKey(fk) => Some(&fk.table),
            Self::CreateIndex(index) => Some(&index.table),
            Self::CopyData { target, .. } => Some(target),
            Self::CreateDatabase { .. }
            | Self::DropDatabase { .. }
            | Self::CreateSequence { .. }
            | Self::DropSequence { .. }
            | Self::MoveSequence { .. }
            | Self::RenameSequence { .. }
            | Self::AlterSequence { .. } => None,
        }
    }
}

/// Discriminant of [`MigrationOperation`], used to key the operation
/// collection and to name operations in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperationKind {
    CreateDatabase,
    DropDatabase,
    CreateSequence,
    DropSequence,
    MoveSequence,
    RenameSequence,
    AlterSequence,
    CreateTable,
    DropTable,
    RenameTable,
    MoveTable,
    AddColumn,
    DropColumn,
    AlterColumn,
    AddDefaultConstraint,
    DropDefaultConstraint,
    RenameColumn,
    AddPrimaryKey,
    DropPrimaryKey,
    AddUniqueConstraint,
    DropUniqueConstraint,
    AddForeignKey,
    DropForeignKey,
    CreateIndex,
    DropIndex,
    RenameIndex,
    CopyData,
}

impl OperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateDatabase => "CreateDatabase",
            Self::DropDatabase => "DropDatabase",
            Self::CreateSequence => "CreateSequence",
            Self::DropSequence => "DropSequence",
            Self::MoveSequence => "MoveSequence",
            Self::RenameSequence => "RenameSequence",
            Self::AlterSequence => "AlterSequence",
            Self::CreateTable => "CreateTable",
            Self::DropTable => "DropTable",
            Self::RenameTable => "RenameTable",
            Self::MoveTable => "MoveTable",
            Self::AddColumn => "AddColumn",
            Self::DropColumn => "DropColumn",
            Self::AlterColumn => "AlterColumn",
            Self::AddDefaultConstraint => "AddDefaultConstraint",
            Self::DropDefaultConstraint => "DropDefaultConstraint",
            Self::RenameColumn => "RenameColumn",
            Self::AddPrimaryKey => "AddPrimaryKey",
            Self::DropPrimaryKey => "DropPrimaryKey",
            Self::AddUniqueConstraint => "AddUniqueConstraint",
            Self::DropUniqueConstraint => "DropUniqueConstraint",
            Self::AddForeignKey => "AddForeignKey",
            Self::DropForeignKey => "DropForeignKey",
            Self::CreateIndex => "CreateIndex",
            Self::DropIndex => "DropIndex",
            Self::RenameIndex => "RenameIndex",
            Self::CopyData => "CopyData",
        }
    }
}

/// Snapshotted column: name, resolved storage type, and the attributes the
/// generators need to render a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnModel {
    pub name: String,
    pub kind: PrimitiveKind,
    pub storage_type: String,
    pub nullable: bool,
    pub max_length: Option<u32>,
    pub identity: bool,
    pub computed: bool,
    pub concurrency_token: bool,
    pub default_value: Option<DefaultValue>,
    pub default_sql: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: SchemaQualifiedName,
    pub columns: Vec<ColumnModel>,
    pub primary_key: Option<PrimaryKeyDefinition>,
    pub unique_constraints: Vec<UniqueConstraintDefinition>,
    pub foreign_keys: Vec<ForeignKeyDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKeyDefinition {
    pub table: SchemaQualifiedName,
    pub name: String,
    pub columns: Vec<String>,
    pub clustered: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniqueConstraintDefinition {
    pub table: SchemaQualifiedName,
    pub name: String,
    pub columns: Vec<String>,
}

/// Cascade policy travels on the operation itself; generators never consult
/// a factory-wide default.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyDefinition {
    pub table: SchemaQualifiedName,
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: SchemaQualifiedName,
    pub referenced_columns: Vec<String>,
    pub cascade_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub table: SchemaQualifiedName,
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub clustered: Option<bool>,
}
