use crate::model::SchemaQualifiedName;
use crate::operations::{MigrationOperation, MigrationOperationCollection, OperationKind};

/// Reserved prefix for the temporary names inserted to break transitive
/// rename chains. Seeing one in a live database marks a migration that
/// stopped between steps.
pub const TEMP_NAME_PREFIX: &str = "__mig_tmp__";

/// Breaks rename chains within each rename category (sequence, table,
/// column, index) by routing the conflicting rename through a fresh
/// temporary name and appending a trailing rename to the intended name.
/// After resolution every prefix of the plan keeps all names unique.
pub(crate) fn resolve_transitive_renames(operations: &mut MigrationOperationCollection) {
    let mut counter = 0usize;
    resolve_kind(operations, OperationKind::RenameSequence, &mut counter);
    resolve_kind(operations, OperationKind::RenameTable, &mut counter);
    resolve_kind(operations, OperationKind::RenameColumn, &mut counter);
    resolve_kind(operations, OperationKind::RenameIndex, &mut counter);
}

fn resolve_kind(
    operations: &mut MigrationOperationCollection,
    kind: OperationKind,
    counter: &mut usize,
) {
    let renames = operations.take(kind);
    if renames.len() < 2 {
        operations.replace(kind, renames);
        return;
    }

    let mut slots: Vec<RenameSlot> = renames.into_iter().map(RenameSlot::from).collect();
    let mut trailing = Vec::new();
    let before = *counter;

    for index in 0..slots.len() {
        let occupied = slots
            .iter()
            .skip(index + 1)
            .any(|later| later.scope == slots[index].scope && later.old == slots[index].new);
        if occupied {
            let temp = format!("{TEMP_NAME_PREFIX}{counter}");
            *counter += 1;

            let mut tail = slots[index].clone();
            tail.old = temp.clone();
            trailing.push(tail);
            slots[index].new = temp;
        }
    }

    slots.extend(trailing);
    operations.replace(
        kind,
        slots.into_iter().map(RenameSlot::into_operation).collect(),
    );

    if *counter > before {
        tracing::debug!(
            kind = kind.as_str(),
            temps = *counter - before,
            "broke rename chains"
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
enum RenameScope {
    Schema(Option<String>),
    Table(SchemaQualifiedName),
}

#[derive(Debug, Clone)]
struct RenameSlot {
    kind: OperationKind,
    scope: RenameScope,
    old: String,
    new: String,
}

impl From<MigrationOperation> for RenameSlot {
    fn from(operation: MigrationOperation) -> Self {
        match operation {
            MigrationOperation::RenameSequence { name, new_name } => Self {
                kind: OperationKind::RenameSequence,
                scope: RenameScope::Schema(name.schema),
                old: name.name,
                new: new_name,
            },
            MigrationOperation::RenameTable { name, new_name } => Self {
                kind: OperationKind::RenameTable,
                scope: RenameScope::Schema(name.schema),
                old: name.name,
                new: new_name,
            },
            MigrationOperation::RenameColumn {
                table,
                name,
                new_name,
            } => Self {
                kind: OperationKind::RenameColumn,
                scope: RenameScope::Table(table),
                old: name,
                new: new_name,
            },
            MigrationOperation::RenameIndex {
                table,
                name,
                new_name,
            } => Self {
                kind: OperationKind::RenameIndex,
                scope: RenameScope::Table(table),
                old: name,
                new: new_name,
            },
            other => unreachable!("not a rename operation: {:?}", other.kind()),
        }
    }
}

impl RenameSlot {
    fn into_operation(self) -> MigrationOperation {
        match (self.kind, self.scope) {
            (OperationKind::RenameSequence, RenameScope::Schema(schema)) => {
                MigrationOperation::RenameSequence {
                    name: SchemaQualifiedName {
                        schema,
                        name: self.old,
                    },
                    new_name: self.new,
                }
            }
            (OperationKind::RenameTable, RenameScope::Schema(schema)) => {
                MigrationOperation::RenameTable {
                    name: SchemaQualifiedName {
                        schema,
                        name: self.old,
                    },
                    new_name: self.new,
                }
            }
            (OperationKind::RenameColumn, RenameScope::Table(table)) => {
                MigrationOperation::RenameColumn {
                    table,
                    name: self.old,
                    new_name: self.new,
                }
            }
            (OperationKind::RenameIndex, RenameScope::Table(table)) => {
                MigrationOperation::RenameIndex {
                    table,
                    name: self.old,
                    new_name: self.new,
                }
            }
            (kind, _) => unreachable!("mismatched rename slot: {:?}", kind),
        }
    }
}
