use super::csdl::CsdlProperty;
use super::registry::SchemaRegistry;
use super::structured_type::StructuredType;
use super::{PropertyId, TypeIndex};
use crate::core::PrimitiveKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Primitive(PrimitiveKind),
    Complex(TypeIndex),
}

/// Simple (non-navigation) property of a structured type.
#[derive(Debug)]
pub(crate) struct PropertySlot {
    pub internal_name: String,
    pub external_name: String,
    pub db_field_name: String,
    pub kind: PropertyKind,
    pub key: bool,
    pub nullable: bool,
    pub collection: bool,
    pub ignore: bool,
}

impl PropertySlot {
    pub fn complex_type(&self) -> Option<TypeIndex> {
        match self.kind {
            PropertyKind::Complex(index) => Some(index),
            PropertyKind::Primitive(_) => None,
        }
    }
}

/// Handle on a simple property.
#[derive(Clone, Copy)]
pub struct Property<'r> {
    registry: &'r SchemaRegistry,
    id: PropertyId,
}

impl<'r> Property<'r> {
    pub(crate) fn new(registry: &'r SchemaRegistry, id: PropertyId) -> Self {
        Self { registry, id }
    }

    fn slot(&self) -> &'r PropertySlot {
        self.registry.property_slot(self.id)
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn internal_name(&self) -> &'r str {
        &self.slot().internal_name
    }

    pub fn external_name(&self) -> &'r str {
        &self.slot().external_name
    }

    pub fn db_field_name(&self) -> &'r str {
        &self.slot().db_field_name
    }

    pub fn kind(&self) -> PropertyKind {
        self.slot().kind
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.slot().kind {
            PropertyKind::Primitive(kind) => Some(kind),
            PropertyKind::Complex(_) => None,
        }
    }

    pub fn is_key(&self) -> bool {
        self.slot().key
    }

    pub fn is_complex(&self) -> bool {
        self.slot().complex_type().is_some()
    }

    pub fn is_nullable(&self) -> bool {
        self.slot().nullable
    }

    pub fn is_collection(&self) -> bool {
        self.slot().collection
    }

    pub fn ignore(&self) -> bool {
        self.slot().ignore
    }

    /// Type that declares this property.
    pub fn owner(&self) -> StructuredType<'r> {
        StructuredType::new(self.registry, self.id.owner)
    }

    /// Embeddable type of a complex property.
    pub fn structured_type(&self) -> Option<StructuredType<'r>> {
        self.slot()
            .complex_type()
            .map(|index| StructuredType::new(self.registry, index))
    }

    /// Qualified metadata type: `Edm.Int64` or `<namespace>.<ComplexType>`.
    pub fn type_name(&self) -> String {
        match self.slot().kind {
            PropertyKind::Primitive(kind) => kind.edm_name().to_string(),
            PropertyKind::Complex(index) => self
                .registry
                .names()
                .fqn(&self.registry.slot(index).external_name),
        }
    }

    pub fn edm_item(&self) -> CsdlProperty {
        let slot = self.slot();
        CsdlProperty {
            name: slot.external_name.clone(),
            type_name: self.type_name(),
            nullable: slot.nullable,
            collection: slot.collection,
        }
    }
}

impl PartialEq for Property<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.registry, other.registry) && self.id == other.id
    }
}

impl Eq for Property<'_> {}

impl fmt::Debug for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("internal_name", &self.internal_name())
            .field("external_name", &self.external_name())
            .field("key", &self.is_key())
            .finish()
    }
}
