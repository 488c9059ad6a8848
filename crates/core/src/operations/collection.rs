use std::collections::BTreeMap;

use super::{MigrationOperation, OperationKind};

/// Emission precedence when draining the collection into an executable
/// stream. Within a kind, append order is preserved.
const KIND_ORDER: &[OperationKind] = &[
    OperationKind::CreateDatabase,
    OperationKind::MoveSequence,
    OperationKind::RenameSequence,
    OperationKind::CreateSequence,
    OperationKind::DropSequence,
    OperationKind::AlterSequence,
    OperationKind::MoveTable,
    OperationKind::RenameTable,
    OperationKind::CreateTable,
    OperationKind::CopyData,
    OperationKind::DropTable,
    OperationKind::RenameColumn,
    OperationKind::AddColumn,
    OperationKind::DropDefaultConstraint,
    OperationKind::DropColumn,
    OperationKind::AlterColumn,
    OperationKind::AddDefaultConstraint,
    OperationKind::DropPrimaryKey,
    OperationKind::AddPrimaryKey,
    OperationKind::AddUniqueConstraint,
    OperationKind::DropUniqueConstraint,
    OperationKind::AddForeignKey,
    OperationKind::DropForeignKey,
    OperationKind::RenameIndex,
    OperationKind::CreateIndex,
    OperationKind::DropIndex,
    OperationKind::DropDatabase,
];

/// Multimap of migration operations keyed by kind.
///
/// Mutation is confined here: the differ populates a collection while it
/// runs and drains it through [`into_ordered`](Self::into_ordered); callers
/// only ever see the resulting immutable `Vec`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationOperationCollection {
    operations: BTreeMap<OperationKind, Vec<MigrationOperation>>,
}

impl MigrationOperationCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, operation: MigrationOperation) {
        self.operations
            .entry(operation.kind())
            .or_default()
            .push(operation);
    }

    #[must_use]
    pub fn get(&self, kind: OperationKind) -> &[MigrationOperation] {
        self.operations
            .get(&kind)
            .map_or(&[], |operations| operations.as_slice())
    }

    /// Removes and returns every operation of one kind, preserving append
    /// order.
    #[must_use]
    pub fn take(&mut self, kind: OperationKind) -> Vec<MigrationOperation> {
        self.operations.remove(&kind).unwrap_or_default()
    }

    /// Replaces the bucket for one kind wholesale. Used by the transitive
    /// rename resolver to rewrite a rename bucket in place.
    pub fn replace(&mut self, kind: OperationKind, operations: Vec<MigrationOperation>) {
        if operations.is_empty() {
            self.operations.remove(&kind);
        } else {
            self.operations.insert(kind, operations);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.values().all(Vec::is_empty)
    }

    /// Drains the collection in the canonical emission order.
    #[must_use]
    pub fn into_ordered(mut self) -> Vec<MigrationOperation> {
        let mut ordered = Vec::with_capacity(self.len());
        for kind in KIND_ORDER {
            ordered.extend(self.take(*kind));
        }
        debug_assert!(self.is_empty(), "kind order must cover every bucket");
        ordered
    }
}
