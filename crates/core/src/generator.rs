use crate::error::{Error, MigrationError, Result};
use crate::model::SchemaQualifiedName;
use crate::operations::{ColumnModel, MigrationOperation};

/// One executable statement. Statements are complete, self-contained
/// utterances; the core never numbers, batches, or separates them beyond
/// newlines embedded in the text. `transactional` is false for statements
/// the dialect cannot run inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub transactional: bool,
}

impl SqlStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            transactional: true,
        }
    }

    pub fn non_transactional(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            transactional: false,
        }
    }
}

/// Renders migration operations to dialect-specific SQL text.
pub trait SqlGenerator {
    fn dialect(&self) -> &str;

    /// Renders the full operation stream. Fails fast with
    /// [`MigrationError::OperationNotSupported`] on the first operation the
    /// dialect cannot express.
    fn generate_ddl(&self, operations: &[MigrationOperation]) -> Result<Vec<SqlStatement>>;
}

/// Error for an operation the dialect cannot express; the message names
/// both the dialect and the operation kind.
#[must_use]
pub fn unsupported_operation(dialect: &str, operation: &MigrationOperation) -> Error {
    MigrationError::OperationNotSupported {
        dialect: dialect.to_string(),
        operation: operation.kind().as_str().to_string(),
    }
    .into()
}

/// Shared identifier/literal quoting and column rendering for relational
/// dialects. Dialect generators compose one of these rather than inherit
/// from each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlHelper {
    open: char,
    close: char,
}

impl SqlHelper {
    #[must_use]
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }

    /// Wraps an identifier in the dialect delimiters, doubling any embedded
    /// closing delimiter.
    #[must_use]
    pub fn delimit(&self, identifier: &str) -> String {
        let mut delimited = String::with_capacity(identifier.len() + 2);
        delimited.push(self.open);
        for ch in identifier.chars() {
            delimited.push(ch);
            if ch == self.close {
                delimited.push(self.close);
            }
        }
        delimited.push(self.close);
        delimited
    }

    /// `[schema].[name]`, or `[name]` when no schema is present.
    #[must_use]
    pub fn delimit_qualified(&self, name: &SchemaQualifiedName) -> String {
        match &name.schema {
            Some(schema) => format!("{}.{}", self.delimit(schema), self.delimit(&name.name)),
            None => self.delimit(&name.name),
        }
    }

    /// Inverse of [`delimit`](Self::delimit). `None` when the input is not a
    /// well-formed delimited identifier.
    #[must_use]
    pub fn unquote(&self, delimited: &str) -> Option<String> {
        let inner = delimited
            .strip_prefix(self.open)?
            .strip_suffix(self.close)?;
        let mut unquoted = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            unquoted.push(ch);
            if ch == self.close && chars.next() != Some(self.close) {
                return None;
            }
        }
        Some(unquoted)
    }

    /// Single-quoted string literal with embedded quotes doubled.
    #[must_use]
    pub fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Uppercase hex digits without any prefix; dialects add `0x` or `X''`.
    #[must_use]
    pub fn hex(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|byte| format!("{byte:02X}")).collect()
    }

    /// Comma-separated delimited column list.
    #[must_use]
    pub fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|column| self.delimit(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Shared column declaration: delimited name, storage type, nullability,
    /// and an optional pre-rendered default literal. Dialect-specific
    /// clauses (identity, clustering) are appended by the caller.
    #[must_use]
    pub fn column_definition(&self, column: &ColumnModel, default: Option<String>) -> String {
        let mut sql = format!("{} {}", self.delimit(&column.name), column.storage_type);
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default);
        }
        sql
    }
}
