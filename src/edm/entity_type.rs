use super::csdl::{CsdlEntityType, CsdlPropertyRef};
use super::path::Path;
use super::property::Property;
use super::structured_type::StructuredType;
use super::PropertyId;
use crate::core::{ModelError, Result};
use crate::metamodel::IdType;
use log::debug;
use std::fmt;
use std::ops::Deref;

/// Handle on an entity type: a structured type with an identity.
///
/// Dereferences to [`StructuredType`] for names, properties and paths.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EntityType<'r> {
    inner: StructuredType<'r>,
}

impl<'r> EntityType<'r> {
    pub(crate) fn new(inner: StructuredType<'r>) -> Self {
        Self { inner }
    }

    pub fn as_structured(&self) -> StructuredType<'r> {
        self.inner
    }

    /// Key attributes in order: own declared key properties, then the key
    /// properties inherited from the base type.
    ///
    /// An own embedded key is returned as the embedding property; an
    /// embedded key inherited from a base type is rejected.
    pub fn key(&self) -> Result<Vec<Property<'r>>> {
        let registry = self.inner.registry();
        let slot = self.inner.slot();
        let ids = slot
            .key
            .ensure(|| format!("key of {}", slot.class_name), || self.resolve_key())?;
        Ok(ids.iter().map(|id| Property::new(registry, *id)).collect())
    }

    fn resolve_key(&self) -> Result<Vec<PropertyId>> {
        let mut key: Vec<PropertyId> = self
            .declared_properties()
            .filter(|property| property.is_key())
            .map(|property| property.id())
            .collect();

        if let Some(base) = self.base_type() {
            for path in base.path_list()? {
                let root = path.root();
                if !root.is_key() {
                    continue;
                }
                if root.is_complex() {
                    return Err(ModelError::embedded_key(base.external_name()));
                }
                if !key.contains(&root.id()) {
                    key.push(root.id());
                }
            }
        }

        if key.is_empty() && !self.determine_abstract() {
            return Err(ModelError::MissingKey(self.external_name().to_string()));
        }
        debug!(
            "Key of '{}' has {} attribute(s)",
            self.class_name(),
            key.len()
        );
        Ok(key)
    }

    /// Explicit identifier type, if the model exposes one.
    pub fn key_type(&self) -> Option<&'r IdType> {
        self.inner.slot().id_type.as_ref()
    }

    pub fn determine_abstract(&self) -> bool {
        self.inner.slot().is_abstract
    }

    /// Path entries the key attributes project onto. An embedded key
    /// contributes all of its leaves.
    pub fn key_paths(&self) -> Result<Vec<Path<'r>>> {
        let mut result = Vec::new();
        for property in self.key()? {
            if property.is_complex() {
                result.extend(self.search_child_path(property.external_name())?);
            } else {
                let path = self.path(property.external_name())?.ok_or_else(|| {
                    ModelError::PropertyNotFound(
                        self.external_name().to_string(),
                        property.external_name().to_string(),
                    )
                })?;
                result.push(path);
            }
        }
        Ok(result)
    }

    /// Non-ignored leaf paths at or below `prefix` (`Address` matches
    /// `Address/City` but not `AddressLine`).
    pub fn search_child_path(&self, prefix: &str) -> Result<Vec<Path<'r>>> {
        Ok(self
            .path_list()?
            .into_iter()
            .filter(|path| !path.ignore() && path.entry().is_below(prefix))
            .collect())
    }

    /// Metadata document, built once.
    pub fn edm_item(&self) -> Result<&'r CsdlEntityType> {
        let slot = self.inner.slot();
        slot.entity_item.ensure(
            || format!("entity type {}", slot.class_name),
            || {
                let base_type = self.base_type();
                let key = match base_type {
                    Some(_) => None,
                    None => Some(self.edm_key()?).filter(|refs| !refs.is_empty()),
                };
                Ok(CsdlEntityType {
                    name: slot.external_name.clone(),
                    base_type: base_type.map(|base| base.qualified_name()),
                    r#abstract: slot.is_abstract,
                    key,
                    properties: self.edm_properties(),
                    navigation_properties: self.edm_navigation_properties()?,
                })
            },
        )
    }

    fn edm_key(&self) -> Result<Vec<CsdlPropertyRef>> {
        self.key()?
            .into_iter()
            .map(|property| {
                if property.is_complex() {
                    Err(ModelError::embedded_key(self.external_name()))
                } else {
                    Ok(CsdlPropertyRef {
                        name: property.external_name().to_string(),
                    })
                }
            })
            .collect()
    }
}

impl<'r> Deref for EntityType<'r> {
    type Target = StructuredType<'r>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Debug for EntityType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("class_name", &self.class_name())
            .field("external_name", &self.external_name())
            .field("abstract", &self.determine_abstract())
            .finish()
    }
}
