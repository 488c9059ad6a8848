mod entity;
mod name;
mod types;

pub use entity::{EntityType, ForeignKey, Index, Key, Property, SchemaModel, Sequence};
pub use name::SchemaQualifiedName;
pub use types::{DefaultValue, PrimitiveKind};
