//! Navigation properties: relationship metadata between structured types.
//!
//! A navigation property is named when the registry is built. Its target
//! type, cardinality, join columns and partner are resolved on first demand:
//!
//! 1. the target entity type is looked up in the registry by the element
//!    class;
//! 2. cardinality and nullability follow the relationship kind;
//! 3. join columns come from the explicit column list, the explicit single
//!    column, or (inverse side of a bidirectional association) are copied
//!    from the owning side;
//! 4. a blank column name is filled from the single-column key of the "one"
//!    side of the relationship, at most once per relationship;
//! 5. for entity sources, the partner on the target side is linked.
//!
//! Partner linking only reads the naming data of the other side (external
//! name, `mappedBy`), which is fixed before any resolution starts. That keeps
//! the mutual lookup of two partners free of recursion. Copying join columns
//! from the owning side does resolve the owning side; the owning side never
//! needs the inverse side's columns, so this terminates. A model where it
//! would not (two sides each mapped by the other) fails with
//! [`ModelError::CyclicResolution`].

use super::csdl::CsdlNavigationProperty;
use super::entity_type::EntityType;
use super::join_column::JoinColumn;
use super::registry::SchemaRegistry;
use super::resolution::{Phase, Resolution};
use super::structured_type::StructuredType;
use super::{NavigationId, TypeIndex};
use crate::core::{ModelError, Result};
use crate::metamodel::{JoinColumnSpec, Relationship, RelationshipKind, TypeKind};
use log::debug;
use std::fmt;

/// Multiplicity of the target end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOneRequired,
    ToOneOptional,
    ToMany,
}

pub(crate) struct NavigationSlot {
    pub internal_name: String,
    pub external_name: String,
    pub ignore: bool,
    pub collection: bool,
    pub relationship: Relationship,
    pub resolved: Resolution<ResolvedNavigation>,
}

impl NavigationSlot {
    pub fn mapped_by(&self) -> Option<&str> {
        self.relationship.effective_mapped_by()
    }

    /// Inverse (non-owning) side of a bidirectional association.
    pub fn is_mapped(&self) -> bool {
        self.mapped_by().is_some()
    }
}

#[derive(Debug)]
pub(crate) struct ResolvedNavigation {
    target: TypeIndex,
    cardinality: Cardinality,
    nullable: Option<bool>,
    join_columns: Vec<JoinColumn>,
    partner: Option<NavigationId>,
}

pub(crate) fn resolve_navigation(
    registry: &SchemaRegistry,
    id: NavigationId,
) -> Result<ResolvedNavigation> {
    let slot = registry.navigation_slot(id);
    let relationship = &slot.relationship;
    let name = slot.internal_name.as_str();

    // Only entity types can be navigated to.
    let target = registry
        .type_index(&relationship.target_class)
        .filter(|index| registry.slot(*index).kind == TypeKind::Entity)
        .ok_or_else(|| {
            ModelError::TargetTypeNotFound(name.to_string(), relationship.target_class.clone())
        })?;

    let source_one = relationship.kind.is_source_one();
    let nullable = relationship
        .kind
        .has_optional_flag()
        .then_some(relationship.optional);
    let cardinality = if slot.collection || relationship.kind.is_to_many() {
        Cardinality::ToMany
    } else if relationship.optional {
        Cardinality::ToOneOptional
    } else {
        Cardinality::ToOneRequired
    };

    let inference = Inference {
        registry,
        relationship: name,
        source: id.owner,
        target,
        source_one,
    };
    let mut join_columns = Vec::new();
    let mut implicit_columns = 0;

    match &relationship.join_columns {
        JoinColumnSpec::Multiple(defs) => {
            for def in defs {
                let mut column = JoinColumn::from(def);
                if column.is_implicit() {
                    implicit_columns += 1;
                    if implicit_columns > 1 {
                        return Err(ModelError::implicit_columns(name));
                    }
                    inference.fill_missing_name(&mut column)?;
                }
                join_columns.push(column);
            }
        }
        JoinColumnSpec::Single(def) => {
            let mut column = JoinColumn::from(def);
            if column.is_implicit() {
                inference.fill_missing_name(&mut column)?;
            }
            join_columns.push(column);
        }
        JoinColumnSpec::None => {
            if let Some(mapped_by) = slot.mapped_by() {
                let owning = find_owning_side(registry, id, target, mapped_by)?;
                let owning = NavigationProperty::new(registry, owning);
                join_columns.extend(owning.join_columns()?.iter().cloned());
                for column in &mut join_columns {
                    if column.referenced_column_name().is_empty() {
                        implicit_columns += 1;
                        if implicit_columns > 1 {
                            return Err(ModelError::implicit_columns(name));
                        }
                        column.set_referenced_column_name(inference.key_field(id.owner)?);
                    }
                }
            }
        }
    }

    let partner = if registry.slot(id.owner).kind == TypeKind::Entity {
        link_partner(registry, id, target)?
    } else {
        None
    };

    Ok(ResolvedNavigation {
        target,
        cardinality,
        nullable,
        join_columns,
        partner,
    })
}

fn link_partner(
    registry: &SchemaRegistry,
    id: NavigationId,
    target: TypeIndex,
) -> Result<Option<NavigationId>> {
    let slot = registry.navigation_slot(id);
    let partner = match slot.mapped_by() {
        Some(mapped_by) => Some(find_owning_side(registry, id, target, mapped_by)?),
        None => find_inverse_side(registry, id, target)
            .filter(|candidate| registry.navigation_slot(*candidate).is_mapped()),
    };

    if let Some(partner) = partner {
        debug!(
            "Linked '{}' with partner '{}'",
            slot.internal_name,
            registry.navigation_slot(partner).external_name
        );
    }
    Ok(partner)
}

/// Navigation properties of `index` and of its base types.
fn navigations_of(registry: &SchemaRegistry, index: TypeIndex) -> Vec<NavigationId> {
    let mut result = Vec::new();
    let mut current = Some(index);
    while let Some(owner) = current {
        let slot = registry.slot(owner);
        result.extend((0..slot.navigations.len()).map(|pos| NavigationId::new(owner, pos)));
        current = slot.base_type;
    }
    result
}

/// The relationship on the target side that `mappedBy` names.
fn find_owning_side(
    registry: &SchemaRegistry,
    id: NavigationId,
    target: TypeIndex,
    mapped_by: &str,
) -> Result<NavigationId> {
    navigations_of(registry, target)
        .into_iter()
        .find(|candidate| {
            *candidate != id && registry.navigation_slot(*candidate).internal_name == mapped_by
        })
        .ok_or_else(|| {
            ModelError::MappedByNotFound(
                registry.navigation_slot(id).internal_name.clone(),
                mapped_by.to_string(),
            )
        })
}

/// A relationship on the target side whose `mappedBy` names this one and
/// that points back to the source type.
fn find_inverse_side(
    registry: &SchemaRegistry,
    id: NavigationId,
    target: TypeIndex,
) -> Option<NavigationId> {
    let name = &registry.navigation_slot(id).internal_name;
    navigations_of(registry, target).into_iter().find(|candidate| {
        let other = registry.navigation_slot(*candidate);
        *candidate != id
            && other.mapped_by() == Some(name.as_str())
            && points_back(registry, &other.relationship, id.owner)
    })
}

fn points_back(registry: &SchemaRegistry, relationship: &Relationship, source: TypeIndex) -> bool {
    let Some(target) = registry.type_index(&relationship.target_class) else {
        return false;
    };
    let mut current = Some(source);
    while let Some(index) = current {
        if index == target {
            return true;
        }
        current = registry.slot(index).base_type;
    }
    false
}

struct Inference<'a> {
    registry: &'a SchemaRegistry,
    relationship: &'a str,
    source: TypeIndex,
    target: TypeIndex,
    source_one: bool,
}

impl Inference<'_> {
    /// Fills the blank name of `column` from the key of the "one" side.
    fn fill_missing_name(&self, column: &mut JoinColumn) -> Result<()> {
        if column.name().is_empty() && column.referenced_column_name().is_empty() {
            return Err(ModelError::NotSupported(format!(
                "Relationship {}: join column without any name",
                self.relationship
            )));
        }
        let one_side = if self.source_one { self.source } else { self.target };
        let field = self.key_field(one_side)?;
        debug!(
            "Relationship '{}': inferred join column name '{}'",
            self.relationship, field
        );
        if column.referenced_column_name().is_empty() {
            column.set_referenced_column_name(field);
        } else {
            column.set_name(field);
        }
        Ok(())
    }

    /// Database field of the single-column key of `index`.
    fn key_field(&self, index: TypeIndex) -> Result<String> {
        let entity = StructuredType::new(self.registry, index)
            .as_entity()
            .ok_or_else(|| ModelError::NotAnEntity(self.registry.slot(index).class_name.clone()))?;
        let key = entity.key()?;
        match key.as_slice() {
            [] => Err(ModelError::MissingKey(entity.external_name().to_string())),
            [single] if !single.is_complex() => Ok(single.db_field_name().to_string()),
            _ => Err(ModelError::NotSupported(format!(
                "Relationship {}: join column inference needs a single-column key, '{}' has a composite key",
                self.relationship,
                entity.external_name()
            ))),
        }
    }
}

/// Handle on a navigation property.
#[derive(Clone, Copy)]
pub struct NavigationProperty<'r> {
    registry: &'r SchemaRegistry,
    id: NavigationId,
}

impl<'r> NavigationProperty<'r> {
    pub(crate) fn new(registry: &'r SchemaRegistry, id: NavigationId) -> Self {
        Self { registry, id }
    }

    fn slot(&self) -> &'r NavigationSlot {
        self.registry.navigation_slot(self.id)
    }

    fn resolved(&self) -> Result<&'r ResolvedNavigation> {
        let slot = self.slot();
        slot.resolved
            .ensure(|| slot.internal_name.clone(), || {
                resolve_navigation(self.registry, self.id)
            })
    }

    /// Forces resolution; repeated calls return the cached outcome.
    pub fn resolve(&self) -> Result<()> {
        self.resolved().map(|_| ())
    }

    pub fn phase(&self) -> Phase {
        self.slot().resolved.phase()
    }

    pub fn id(&self) -> NavigationId {
        self.id
    }

    pub fn internal_name(&self) -> &'r str {
        &self.slot().internal_name
    }

    pub fn external_name(&self) -> &'r str {
        &self.slot().external_name
    }

    pub fn ignore(&self) -> bool {
        self.slot().ignore
    }

    pub fn is_collection(&self) -> bool {
        self.slot().collection
    }

    pub fn mapped_by(&self) -> Option<&'r str> {
        self.slot().mapped_by()
    }

    pub fn is_mapped(&self) -> bool {
        self.slot().is_mapped()
    }

    /// Relationship kind as annotated.
    pub fn join_cardinality(&self) -> RelationshipKind {
        self.slot().relationship.kind
    }

    pub fn source_type(&self) -> StructuredType<'r> {
        StructuredType::new(self.registry, self.id.owner)
    }

    pub fn target_entity(&self) -> Result<EntityType<'r>> {
        let resolved = self.resolved()?;
        Ok(EntityType::new(StructuredType::new(self.registry, resolved.target)))
    }

    pub fn cardinality(&self) -> Result<Cardinality> {
        Ok(self.resolved()?.cardinality)
    }

    /// Explicit optional flag; `None` when the relationship kind has none.
    pub fn nullable(&self) -> Result<Option<bool>> {
        Ok(self.resolved()?.nullable)
    }

    pub fn join_columns(&self) -> Result<&'r [JoinColumn]> {
        Ok(&self.resolved()?.join_columns)
    }

    pub fn partner(&self) -> Result<Option<NavigationProperty<'r>>> {
        let resolved = self.resolved()?;
        Ok(resolved
            .partner
            .map(|id| NavigationProperty::new(self.registry, id)))
    }

    /// External name of the partner.
    pub fn partner_name(&self) -> Result<Option<&'r str>> {
        Ok(self.partner()?.map(|partner| partner.external_name()))
    }

    pub fn edm_item(&self) -> Result<CsdlNavigationProperty> {
        let resolved = self.resolved()?;
        let target = self.registry.slot(resolved.target);
        Ok(CsdlNavigationProperty {
            name: self.external_name().to_string(),
            type_name: self.registry.names().fqn(&target.external_name),
            collection: self.is_collection(),
            nullable: resolved.nullable,
            partner: self.partner_name()?.map(str::to_string),
        })
    }
}

impl PartialEq for NavigationProperty<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.registry, other.registry) && self.id == other.id
    }
}

impl Eq for NavigationProperty<'_> {}

impl fmt::Debug for NavigationProperty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationProperty")
            .field("internal_name", &self.internal_name())
            .field("external_name", &self.external_name())
            .field("kind", &self.join_cardinality())
            .finish()
    }
}
