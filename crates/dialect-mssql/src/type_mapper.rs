use relmig_core::{PrimitiveKind, Property, TypeMapper};

/// Canonical SQL Server storage type selection.
///
/// Variable-length kinds narrow when they participate in a key (index key
/// size limits) and binary concurrency tokens become `rowversion`; an
/// explicit max length always wins over both defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerTypeMapper;

impl TypeMapper for SqlServerTypeMapper {
    fn storage_type(&self, property: &Property, is_key: bool) -> String {
        match property.kind {
            PrimitiveKind::Bool => "bit".to_string(),
            PrimitiveKind::Byte => "tinyint".to_string(),
            PrimitiveKind::SByte | PrimitiveKind::Int16 => "smallint".to_string(),
            PrimitiveKind::Int32 | PrimitiveKind::UInt16 | PrimitiveKind::Char => "int".to_string(),
            PrimitiveKind::Int64 | PrimitiveKind::UInt32 => "bigint".to_string(),
            PrimitiveKind::UInt64 => "numeric(20,0)".to_string(),
            PrimitiveKind::Float32 => "real".to_string(),
            PrimitiveKind::Float64 => "float".to_string(),
            PrimitiveKind::Decimal => "decimal(18,2)".to_string(),
            PrimitiveKind::DateTime => "datetime2".to_string(),
            PrimitiveKind::DateTimeOffset => "datetimeoffset".to_string(),
            PrimitiveKind::TimeSpan => "time".to_string(),
            PrimitiveKind::Guid => "uniqueidentifier".to_string(),
            PrimitiveKind::Text => match (property.max_length, is_key) {
                (Some(length), _) => format!("nvarchar({length})"),
                (None, true) => "nvarchar(128)".to_string(),
                (None, false) => "nvarchar(max)".to_string(),
            },
            PrimitiveKind::Binary => {
                if property.concurrency_token {
                    "rowversion".to_string()
                } else {
                    match (property.max_length, is_key) {
                        (Some(length), _) => format!("varbinary({length})"),
                        (None, true) => "varbinary(128)".to_string(),
                        (None, false) => "varbinary(max)".to_string(),
                    }
                }
            }
        }
    }

    fn sequence_storage_type(&self, kind: PrimitiveKind) -> String {
        match kind {
            PrimitiveKind::Byte => "tinyint".to_string(),
            PrimitiveKind::SByte | PrimitiveKind::Int16 => "smallint".to_string(),
            PrimitiveKind::Int32 | PrimitiveKind::UInt16 => "int".to_string(),
            PrimitiveKind::UInt64 => "numeric(20,0)".to_string(),
            PrimitiveKind::Decimal => "decimal(18,2)".to_string(),
            _ => "bigint".to_string(),
        }
    }
}
