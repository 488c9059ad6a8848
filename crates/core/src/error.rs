use thiserror::Error;

/// Failures raised by pre-processors and SQL generators. The differ itself
/// never fails: unknown constructs simply produce no operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// The dialect cannot express the operation. Raised at the moment the
    /// operation is encountered.
    #[error("migration operation `{operation}` is not supported by the {dialect} dialect")]
    OperationNotSupported { dialect: String, operation: String },

    /// A pre-processor invariant was violated. Fatal: the caller must abort
    /// applying the diff and roll back any open transaction.
    #[error("invalid operation sequence for table `{table}`: {reason}")]
    InvalidOperationSequence { table: String, reason: String },
}

/// Error surface shared with the object change-tracker collaborator.
///
/// The migration core never raises these; they are declared here so that
/// hosts consume one error vocabulary across the toolkit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChangeTrackerError {
    #[error("multiple principal entities match the foreign key values of `{dependent}`")]
    AmbiguousPrincipal { dependent: String },

    #[error("cannot track entity `{entity}` because its primary key value is null")]
    NullPrimaryKey { entity: String },

    #[error("another instance of `{entity}` with the same key value is already tracked")]
    IdentityConflict { entity: String },

    #[error("multiple state entries exist for entity `{entity}`")]
    MultipleStateEntries { entity: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error(transparent)]
    Tracker(#[from] ChangeTrackerError),
}

pub type Result<T> = std::result::Result<T, Error>;
