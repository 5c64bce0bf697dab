//! API metadata built from a persistence model.
//!
//! [`SchemaRegistry`] owns one descriptor per persistence class. The public
//! handles ([`StructuredType`], [`EntityType`], [`Property`],
//! [`NavigationProperty`], [`Path`]) borrow the registry and stay valid for
//! its lifetime.

pub mod csdl;
pub mod entity_type;
pub mod join_column;
pub mod name_builder;
pub mod navigation;
pub mod path;
pub mod post_processor;
pub mod property;
pub mod registry;
pub mod resolution;
pub mod structured_type;

pub use csdl::{
    CsdlComplexType, CsdlEntityType, CsdlNavigationProperty, CsdlProperty, CsdlPropertyRef,
    CsdlSchema,
};
pub use entity_type::EntityType;
pub use join_column::JoinColumn;
pub use name_builder::{NameBuilder, NameStyle};
pub use navigation::{Cardinality, NavigationProperty};
pub use path::{PATH_SEPARATOR, Path, PathEntry};
pub use post_processor::{ElementNaming, MetadataPostProcessor, NoopPostProcessor};
pub use property::{Property, PropertyKind};
pub use registry::SchemaRegistry;
pub use resolution::Phase;
pub use structured_type::StructuredType;

/// Position of a type in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeIndex(pub(crate) usize);

/// A simple property: owning type and declaration position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId {
    pub(crate) owner: TypeIndex,
    pub(crate) index: usize,
}

impl PropertyId {
    pub(crate) fn new(owner: TypeIndex, index: usize) -> Self {
        Self { owner, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationId {
    pub(crate) owner: TypeIndex,
    pub(crate) index: usize,
}

impl NavigationId {
    pub(crate) fn new(owner: TypeIndex, index: usize) -> Self {
        Self { owner, index }
    }
}
