use relmig_core::{PrimitiveKind, Property, TypeMapper};

/// SQLite's storage classes: everything integral lands in INTEGER, floats
/// in REAL, binary in BLOB, and the rest rides as TEXT.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteTypeMapper;

impl TypeMapper for SqliteTypeMapper {
    fn storage_type(&self, property: &Property, _is_key: bool) -> String {
        let storage = match property.kind {
            PrimitiveKind::Bool
            | PrimitiveKind::Byte
            | PrimitiveKind::SByte
            | PrimitiveKind::Int16
            | PrimitiveKind::UInt16
            | PrimitiveKind::Int32
            | PrimitiveKind::UInt32
            | PrimitiveKind::Int64
            | PrimitiveKind::UInt64
            | PrimitiveKind::Char => "INTEGER",
            PrimitiveKind::Float32 | PrimitiveKind::Float64 => "REAL",
            PrimitiveKind::Decimal
            | PrimitiveKind::Text
            | PrimitiveKind::DateTime
            | PrimitiveKind::DateTimeOffset
            | PrimitiveKind::TimeSpan
            | PrimitiveKind::Guid => "TEXT",
            PrimitiveKind::Binary => "BLOB",
        };
        storage.to_string()
    }

    fn sequence_storage_type(&self, _kind: PrimitiveKind) -> String {
        "INTEGER".to_string()
    }
}
