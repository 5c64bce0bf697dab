//! Everything an application needs to build a registry and render
//! identifiers.

pub use crate::config::MapperConfig;
pub use crate::core::{EmbeddedValue, ModelError, PrimitiveKind, Result, Value};
pub use crate::edm::{
    Cardinality, ElementNaming, EntityType, JoinColumn, MetadataPostProcessor, NameStyle,
    NavigationProperty, Path, Property, SchemaRegistry, StructuredType,
};
pub use crate::identifier::{
    AccessorTable, EntityIdentifierBuilder, IdentifierError, IdentifierResult, ResultRow, TupleRow,
};
pub use crate::metamodel::{
    Attribute, JoinColumnDef, ManagedType, Metamodel, Relationship, RelationshipKind,
};
