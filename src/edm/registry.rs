//! Schema registry: one descriptor per persistence class.
//!
//! Construction is the naming phase. Every type, property and navigation
//! property gets its external name and ignore flag, the post-processor runs
//! once per descriptor, and base and embedded type references are linked.
//! Nothing is resolved yet. Afterwards descriptors resolve lazily on first
//! demand, or all at once through [`SchemaRegistry::resolve_all`].

use super::csdl::CsdlSchema;
use super::entity_type::EntityType;
use super::name_builder::NameBuilder;
use super::navigation::NavigationSlot;
use super::path::{PathIndex, resolve_paths};
use super::post_processor::ElementNaming;
use super::property::{PropertyKind, PropertySlot};
use super::resolution::Resolution;
use super::structured_type::{StructuredType, TypeSlot};
use super::{NavigationId, PropertyId, TypeIndex};
use crate::config::MapperConfig;
use crate::core::{ModelError, Result};
use crate::metamodel::{Attribute, AttributeKind, ManagedType, Metamodel, TypeKind};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{Level, event, info_span};

pub struct SchemaRegistry {
    names: NameBuilder,
    slots: Vec<TypeSlot>,
    by_class: HashMap<String, TypeIndex>,
}

impl SchemaRegistry {
    /// Runs the naming phase over `metamodel`.
    pub fn new(metamodel: &Metamodel, config: MapperConfig) -> Result<Self> {
        let names = config.name_builder();
        let post_processor = config.post_processor.clone();
        let mut slots = Vec::with_capacity(metamodel.types.len());
        let mut by_class = HashMap::new();

        for managed in &metamodel.types {
            if by_class.contains_key(&managed.class_name) {
                return Err(ModelError::DuplicateType(managed.class_name.clone()));
            }
            let mut slot = TypeSlot::new(
                managed.class_name.clone(),
                managed.kind,
                names.type_name(managed),
            );
            slot.ignore = managed.ignore;
            slot.is_abstract = managed.is_abstract;
            slot.id_type = managed.id_type.clone();
            if managed.is_entity() {
                let mut naming =
                    ElementNaming::new(&managed.class_name, &mut slot.external_name, &mut slot.ignore);
                post_processor.process_entity_type(&mut naming, &managed.class_name);
            }
            debug!(
                "Created descriptor '{}' for '{}'",
                slot.external_name, managed.class_name
            );
            by_class.insert(managed.class_name.clone(), TypeIndex(slots.len()));
            slots.push(slot);
        }

        for (pos, managed) in metamodel.types.iter().enumerate() {
            let base_type = match &managed.supertype {
                Some(supertype) => Some(lookup_base(&by_class, &slots, managed, supertype)?),
                None => None,
            };
            let (properties, navigations) =
                name_attributes(&names, &config, &by_class, &slots, managed)?;
            let slot = &mut slots[pos];
            slot.base_type = base_type;
            slot.properties = properties;
            slot.navigations = navigations;
            check_unique_names(slot)?;
        }

        Ok(Self {
            names,
            slots,
            by_class,
        })
    }

    /// Naming phase followed by [`resolve_all`](Self::resolve_all).
    pub fn build(metamodel: &Metamodel, config: MapperConfig) -> Result<Self> {
        let registry = Self::new(metamodel, config)?;
        registry.resolve_all()?;
        Ok(registry)
    }

    /// Resolves every non-ignored descriptor. Stops at the first mapping
    /// defect; afterwards no descriptor changes any more.
    pub fn resolve_all(&self) -> Result<()> {
        let span = info_span!(
            "edm.registry.resolve_all",
            namespace = %self.names.namespace(),
            types = self.slots.len()
        );
        let _enter = span.enter();

        for structured in self.structured_types() {
            if structured.ignore() {
                structured.path_list()?;
                continue;
            }
            if let Err(err) = structured.resolve() {
                event!(
                    Level::ERROR,
                    class = %structured.class_name(),
                    error = %err,
                    "metadata resolution failed"
                );
                return Err(err);
            }
        }

        event!(
            Level::INFO,
            entity_types = self.entity_types().count(),
            complex_types = self.complex_types().count(),
            "metadata resolved"
        );
        Ok(())
    }

    pub fn namespace(&self) -> &str {
        self.names.namespace()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn structured_type(&self, class_name: &str) -> Result<StructuredType<'_>> {
        self.type_index(class_name)
            .map(|index| StructuredType::new(self, index))
            .ok_or_else(|| ModelError::TypeNotFound(class_name.to_string()))
    }

    pub fn entity_type(&self, class_name: &str) -> Result<EntityType<'_>> {
        self.structured_type(class_name)?
            .as_entity()
            .ok_or_else(|| ModelError::NotAnEntity(class_name.to_string()))
    }

    pub fn entity_type_by_external_name(&self, external_name: &str) -> Option<EntityType<'_>> {
        self.entity_types()
            .find(|entity| entity.external_name() == external_name)
    }

    pub fn structured_types(&self) -> impl Iterator<Item = StructuredType<'_>> {
        (0..self.slots.len()).map(move |pos| StructuredType::new(self, TypeIndex(pos)))
    }

    /// Non-ignored entity types in model order.
    pub fn entity_types(&self) -> impl Iterator<Item = EntityType<'_>> {
        self.structured_types()
            .filter(|structured| !structured.ignore())
            .filter_map(|structured| structured.as_entity())
    }

    /// Non-ignored embeddable types in model order.
    pub fn complex_types(&self) -> impl Iterator<Item = StructuredType<'_>> {
        self.structured_types()
            .filter(|structured| !structured.ignore() && !structured.is_entity())
    }

    /// Metadata document of the whole schema.
    pub fn csdl_schema(&self) -> Result<CsdlSchema> {
        let mut entity_types = Vec::new();
        for entity in self.entity_types() {
            entity_types.push(entity.edm_item()?.clone());
        }
        let mut complex_types = Vec::new();
        for complex in self.complex_types() {
            complex_types.push(complex.complex_item()?.clone());
        }
        Ok(CsdlSchema {
            namespace: self.names.namespace().to_string(),
            entity_types,
            complex_types,
        })
    }

    pub(crate) fn names(&self) -> &NameBuilder {
        &self.names
    }

    pub(crate) fn type_index(&self, class_name: &str) -> Option<TypeIndex> {
        self.by_class.get(class_name).copied()
    }

    pub(crate) fn slot(&self, index: TypeIndex) -> &TypeSlot {
        &self.slots[index.0]
    }

    pub(crate) fn property_slot(&self, id: PropertyId) -> &PropertySlot {
        &self.slot(id.owner).properties[id.index]
    }

    pub(crate) fn navigation_slot(&self, id: NavigationId) -> &NavigationSlot {
        &self.slot(id.owner).navigations[id.index]
    }

    pub(crate) fn paths(&self, index: TypeIndex) -> Result<&PathIndex> {
        let slot = self.slot(index);
        slot.paths.ensure(
            || format!("paths of {}", slot.class_name),
            || resolve_paths(self, index),
        )
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("namespace", &self.names.namespace())
            .field("types", &self.slots.len())
            .finish()
    }
}

fn lookup_base(
    by_class: &HashMap<String, TypeIndex>,
    slots: &[TypeSlot],
    managed: &ManagedType,
    supertype: &str,
) -> Result<TypeIndex> {
    let index = *by_class
        .get(supertype)
        .ok_or_else(|| ModelError::TypeNotFound(supertype.to_string()))?;
    if !managed.is_entity() {
        return Err(ModelError::NotAnEntity(managed.class_name.clone()));
    }
    if slots[index.0].kind != TypeKind::Entity {
        return Err(ModelError::NotAnEntity(supertype.to_string()));
    }
    Ok(index)
}

fn name_attributes(
    names: &NameBuilder,
    config: &MapperConfig,
    by_class: &HashMap<String, TypeIndex>,
    slots: &[TypeSlot],
    managed: &ManagedType,
) -> Result<(Vec<PropertySlot>, Vec<NavigationSlot>)> {
    let mut properties = Vec::new();
    let mut navigations = Vec::new();

    for attribute in &managed.attributes {
        let declaring_class = attribute
            .declaring_class
            .as_deref()
            .unwrap_or(&managed.class_name);

        match &attribute.kind {
            AttributeKind::Relationship(relationship) => {
                if attribute.key {
                    warn!(
                        "'{}.{}': key flag on a relationship is ignored",
                        managed.class_name, attribute.name
                    );
                }
                let mut slot = NavigationSlot {
                    internal_name: attribute.name.clone(),
                    external_name: names.navigation_property_name(attribute),
                    ignore: attribute.ignore,
                    collection: attribute.collection || relationship.kind.is_to_many(),
                    relationship: relationship.clone(),
                    resolved: Resolution::new(),
                };
                let mut naming =
                    ElementNaming::new(&attribute.name, &mut slot.external_name, &mut slot.ignore);
                config
                    .post_processor
                    .process_navigation_property(&mut naming, declaring_class);
                navigations.push(slot);
            }
            AttributeKind::Basic(primitive) => {
                let kind = PropertyKind::Primitive(*primitive);
                properties.push(name_property(names, config, attribute, kind, declaring_class));
            }
            AttributeKind::Embedded(class_name) => {
                let kind = PropertyKind::Complex(lookup_embeddable(by_class, slots, class_name)?);
                properties.push(name_property(names, config, attribute, kind, declaring_class));
            }
        }
    }
    Ok((properties, navigations))
}

fn name_property(
    names: &NameBuilder,
    config: &MapperConfig,
    attribute: &Attribute,
    kind: PropertyKind,
    declaring_class: &str,
) -> PropertySlot {
    let mut slot = PropertySlot {
        internal_name: attribute.name.clone(),
        external_name: names.property_name(attribute),
        db_field_name: names.db_field_name(attribute),
        kind,
        key: attribute.key,
        nullable: attribute.nullable && !attribute.key,
        collection: attribute.collection,
        ignore: attribute.ignore,
    };
    let mut naming = ElementNaming::new(&attribute.name, &mut slot.external_name, &mut slot.ignore);
    config.post_processor.process_property(&mut naming, declaring_class);
    slot
}

fn lookup_embeddable(
    by_class: &HashMap<String, TypeIndex>,
    slots: &[TypeSlot],
    class_name: &str,
) -> Result<TypeIndex> {
    let index = *by_class
        .get(class_name)
        .ok_or_else(|| ModelError::TypeNotFound(class_name.to_string()))?;
    if slots[index.0].kind != TypeKind::Embeddable {
        return Err(ModelError::NotSupported(format!(
            "'{class_name}' is an entity and cannot be embedded"
        )));
    }
    Ok(index)
}

/// External names of properties and navigation properties share one scope.
fn check_unique_names(slot: &TypeSlot) -> Result<()> {
    let mut seen = HashSet::new();
    let names = slot
        .properties
        .iter()
        .map(|property| &property.external_name)
        .chain(slot.navigations.iter().map(|navigation| &navigation.external_name));
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ModelError::DuplicateName(slot.external_name.clone(), name.clone()));
        }
    }
    Ok(())
}
