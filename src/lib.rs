// ============================================================================
// ormedm Library
// ============================================================================

//! Compiles a persistence object model (entity and embeddable classes,
//! attributes, relationships, inheritance) into API metadata: entity types,
//! properties, navigation properties with join columns and partners, keys,
//! and canonical per-row entity identifiers.
//!
//! # Examples
//!
//! ```
//! use ormedm::core::PrimitiveKind;
//! use ormedm::metamodel::{Attribute, ManagedType, Metamodel};
//! use ormedm::{MapperConfig, SchemaRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Metamodel::new().with_type(
//!     ManagedType::entity("org.example.Order")
//!         .with_attribute(Attribute::basic("id", PrimitiveKind::Int64).key()),
//! );
//! let registry = SchemaRegistry::build(&model, MapperConfig::new("Shop"))?;
//! let order = registry.entity_type("org.example.Order")?;
//! assert_eq!(order.qualified_name(), "Shop.Order");
//! assert_eq!(order.key()?[0].external_name(), "Id");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod edm;
pub mod identifier;
pub mod metamodel;
pub mod prelude;

// Re-export main types for convenience
pub use config::MapperConfig;
pub use crate::core::{ModelError, Result, Value};
pub use edm::{EntityType, NavigationProperty, SchemaRegistry, StructuredType};
pub use identifier::{AccessorTable, EntityIdentifierBuilder, IdentifierError};
pub use metamodel::Metamodel;
