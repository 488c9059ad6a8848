use relmig_core::{PrimitiveKind, Property, TypeMapper};

/// Deterministic mapper with readable storage names, enough to exercise the
/// differ and factory without pulling in a real dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeTypeMapper;

impl TypeMapper for FakeTypeMapper {
    fn storage_type(&self, property: &Property, is_key: bool) -> String {
        let storage = match property.kind {
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "bigint",
            PrimitiveKind::Text => {
                if is_key {
                    "varchar(128)"
                } else {
                    "varchar"
                }
            }
            _ => "scalar",
        };
        storage.to_string()
    }

    fn sequence_storage_type(&self, _kind: PrimitiveKind) -> String {
        "bigint".to_string()
    }
}
