use super::csdl::{CsdlComplexType, CsdlEntityType, CsdlNavigationProperty, CsdlProperty};
use super::entity_type::EntityType;
use super::navigation::{NavigationProperty, NavigationSlot};
use super::path::{Path, PathIndex};
use super::property::{Property, PropertySlot};
use super::registry::SchemaRegistry;
use super::resolution::Resolution;
use super::{NavigationId, PropertyId, TypeIndex};
use crate::core::{ModelError, Result};
use crate::metamodel::{IdType, TypeKind};
use std::fmt;

/// Descriptor storage of one persistence class, owned by the registry.
pub(crate) struct TypeSlot {
    pub class_name: String,
    pub kind: TypeKind,
    pub external_name: String,
    pub ignore: bool,
    pub is_abstract: bool,
    pub id_type: Option<IdType>,
    pub base_type: Option<TypeIndex>,
    pub properties: Vec<PropertySlot>,
    pub navigations: Vec<NavigationSlot>,
    pub paths: Resolution<PathIndex>,
    pub key: Resolution<Vec<PropertyId>>,
    pub entity_item: Resolution<CsdlEntityType>,
    pub complex_item: Resolution<CsdlComplexType>,
}

impl TypeSlot {
    pub fn new(class_name: String, kind: TypeKind, external_name: String) -> Self {
        Self {
            class_name,
            kind,
            external_name,
            ignore: false,
            is_abstract: false,
            id_type: None,
            base_type: None,
            properties: Vec::new(),
            navigations: Vec::new(),
            paths: Resolution::new(),
            key: Resolution::new(),
            entity_item: Resolution::new(),
            complex_item: Resolution::new(),
        }
    }
}

/// Handle on an entity or embeddable (complex) type.
#[derive(Clone, Copy)]
pub struct StructuredType<'r> {
    registry: &'r SchemaRegistry,
    index: TypeIndex,
}

impl<'r> StructuredType<'r> {
    pub(crate) fn new(registry: &'r SchemaRegistry, index: TypeIndex) -> Self {
        Self { registry, index }
    }

    pub(crate) fn slot(&self) -> &'r TypeSlot {
        self.registry.slot(self.index)
    }

    pub(crate) fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn index(&self) -> TypeIndex {
        self.index
    }

    pub fn class_name(&self) -> &'r str {
        &self.slot().class_name
    }

    pub fn external_name(&self) -> &'r str {
        &self.slot().external_name
    }

    /// `<namespace>.<external name>`
    pub fn qualified_name(&self) -> String {
        self.registry.names().fqn(self.external_name())
    }

    pub fn ignore(&self) -> bool {
        self.slot().ignore
    }

    pub fn kind(&self) -> TypeKind {
        self.slot().kind
    }

    pub fn is_entity(&self) -> bool {
        self.slot().kind == TypeKind::Entity
    }

    pub fn as_entity(&self) -> Option<EntityType<'r>> {
        self.is_entity().then(|| EntityType::new(*self))
    }

    /// Base type of an entity.
    pub fn base_type(&self) -> Option<EntityType<'r>> {
        self.slot()
            .base_type
            .map(|index| EntityType::new(StructuredType::new(self.registry, index)))
    }

    /// Simple properties declared by this type, in declaration order.
    pub fn declared_properties(&self) -> impl Iterator<Item = Property<'r>> + use<'r> {
        let registry = self.registry;
        let index = self.index;
        (0..self.slot().properties.len()).map(move |pos| Property::new(registry, PropertyId::new(index, pos)))
    }

    /// Declared simple properties followed by the inherited ones.
    pub fn properties(&self) -> Vec<Property<'r>> {
        let mut result: Vec<_> = self.declared_properties().collect();
        if let Some(base) = self.base_type() {
            result.extend(base.properties());
        }
        result
    }

    /// Looks a simple property up by internal name, including inherited ones.
    pub fn property(&self, internal_name: &str) -> Result<Property<'r>> {
        self.properties()
            .into_iter()
            .find(|property| property.internal_name() == internal_name)
            .ok_or_else(|| {
                ModelError::PropertyNotFound(self.external_name().to_string(), internal_name.to_string())
            })
    }

    pub fn declared_navigation_properties(&self) -> impl Iterator<Item = NavigationProperty<'r>> + use<'r> {
        let registry = self.registry;
        let index = self.index;
        (0..self.slot().navigations.len())
            .map(move |pos| NavigationProperty::new(registry, NavigationId::new(index, pos)))
    }

    pub fn navigation_properties(&self) -> Vec<NavigationProperty<'r>> {
        let mut result: Vec<_> = self.declared_navigation_properties().collect();
        if let Some(base) = self.base_type() {
            result.extend(base.navigation_properties());
        }
        result
    }

    pub fn navigation_property(&self, internal_name: &str) -> Result<NavigationProperty<'r>> {
        self.navigation_properties()
            .into_iter()
            .find(|navigation| navigation.internal_name() == internal_name)
            .ok_or_else(|| {
                ModelError::PropertyNotFound(self.external_name().to_string(), internal_name.to_string())
            })
    }

    pub(crate) fn path_index(&self) -> Result<&'r PathIndex> {
        self.registry.paths(self.index)
    }

    /// Flattened path for an external alias such as `Address/Country`.
    pub fn path(&self, alias: &str) -> Result<Option<Path<'r>>> {
        let registry = self.registry;
        Ok(self
            .path_index()?
            .get(alias)
            .map(|entry| Path::new(registry, entry)))
    }

    pub fn path_list(&self) -> Result<Vec<Path<'r>>> {
        let registry = self.registry;
        Ok(self
            .path_index()?
            .entries()
            .iter()
            .map(|entry| Path::new(registry, entry))
            .collect())
    }

    /// Resolves paths and navigation properties, and for entities the key
    /// and the metadata document.
    pub fn resolve(&self) -> Result<()> {
        self.path_index()?;
        for navigation in self.declared_navigation_properties() {
            if !navigation.ignore() {
                navigation.resolve()?;
            }
        }
        match self.as_entity() {
            Some(entity) => {
                entity.key()?;
                entity.edm_item()?;
            }
            None => {
                self.complex_item()?;
            }
        }
        Ok(())
    }

    /// Metadata document of an embeddable type.
    pub fn complex_item(&self) -> Result<&'r CsdlComplexType> {
        let slot = self.slot();
        slot.complex_item.ensure(
            || format!("complex type {}", slot.class_name),
            || {
                Ok(CsdlComplexType {
                    name: slot.external_name.clone(),
                    properties: self.edm_properties(),
                    navigation_properties: self.edm_navigation_properties()?,
                })
            },
        )
    }

    pub(crate) fn edm_properties(&self) -> Vec<CsdlProperty> {
        self.declared_properties()
            .filter(|property| !property.ignore())
            .map(|property| property.edm_item())
            .collect()
    }

    pub(crate) fn edm_navigation_properties(&self) -> Result<Vec<CsdlNavigationProperty>> {
        self.declared_navigation_properties()
            .filter(|navigation| !navigation.ignore())
            .map(|navigation| navigation.edm_item())
            .collect()
    }
}

impl PartialEq for StructuredType<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.registry, other.registry) && self.index == other.index
    }
}

impl Eq for StructuredType<'_> {}

impl fmt::Debug for StructuredType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredType")
            .field("class_name", &self.class_name())
            .field("external_name", &self.external_name())
            .field("kind", &self.kind())
            .finish()
    }
}
