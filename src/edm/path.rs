//! Flattened attribute paths of a structured type.
//!
//! Every simple attribute becomes one entry keyed by its external name.
//! Embedded attributes are expanded into their leaves, prefixed with the
//! embedding attribute's external name: `Address/Country`. Attributes
//! inherited from a base type are part of the map as well.

use super::property::Property;
use super::registry::SchemaRegistry;
use super::{PropertyId, TypeIndex};
use crate::core::{ModelError, Result};
use log::debug;
use std::collections::HashMap;
use std::fmt;

pub const PATH_SEPARATOR: char = '/';

/// One flattened path: the chain of attributes from the root attribute of
/// the owning type down to a simple leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    alias: String,
    path: Vec<PropertyId>,
    ignore: bool,
}

impl PathEntry {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn ignore(&self) -> bool {
        self.ignore
    }

    pub fn root_id(&self) -> PropertyId {
        self.path[0]
    }

    pub fn leaf_id(&self) -> PropertyId {
        self.path[self.path.len() - 1]
    }

    pub fn ids(&self) -> &[PropertyId] {
        &self.path
    }

    /// True if `prefix` names this path or one of its ancestors.
    pub fn is_below(&self, prefix: &str) -> bool {
        match self.alias.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with(PATH_SEPARATOR),
            None => false,
        }
    }
}

/// Ordered path map of one type.
#[derive(Debug, Default)]
pub(crate) struct PathIndex {
    entries: Vec<PathEntry>,
    by_alias: HashMap<String, usize>,
}

impl PathIndex {
    fn push(&mut self, owner: &str, entry: PathEntry) -> Result<()> {
        if self.by_alias.contains_key(&entry.alias) {
            return Err(ModelError::DuplicateName(owner.to_string(), entry.alias));
        }
        self.by_alias.insert(entry.alias.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn get(&self, alias: &str) -> Option<&PathEntry> {
        self.by_alias.get(alias).map(|idx| &self.entries[*idx])
    }
}

/// Builds the path map of `owner`. Embedded and base types are resolved
/// through the registry, so their maps are built (once) on the way.
pub(crate) fn resolve_paths(registry: &SchemaRegistry, owner: TypeIndex) -> Result<PathIndex> {
    let slot = registry.slot(owner);
    let mut index = PathIndex::default();

    for (pos, property) in slot.properties.iter().enumerate() {
        let id = PropertyId::new(owner, pos);
        match property.complex_type() {
            Some(embedded) => {
                let nested = registry.paths(embedded)?;
                for leaf in nested.entries() {
                    let mut path = Vec::with_capacity(leaf.path.len() + 1);
                    path.push(id);
                    path.extend_from_slice(&leaf.path);
                    index.push(
                        &slot.external_name,
                        PathEntry {
                            alias: format!("{}{}{}", property.external_name, PATH_SEPARATOR, leaf.alias),
                            path,
                            ignore: property.ignore || leaf.ignore,
                        },
                    )?;
                }
            }
            None => index.push(
                &slot.external_name,
                PathEntry {
                    alias: property.external_name.clone(),
                    path: vec![id],
                    ignore: property.ignore,
                },
            )?,
        }
    }

    if let Some(base) = slot.base_type {
        for inherited in registry.paths(base)?.entries() {
            index.push(&slot.external_name, inherited.clone())?;
        }
    }

    debug!(
        "Resolved {} paths for '{}'",
        index.entries.len(),
        slot.class_name
    );
    Ok(index)
}

/// Borrowed view on a [`PathEntry`].
#[derive(Clone, Copy)]
pub struct Path<'r> {
    registry: &'r SchemaRegistry,
    entry: &'r PathEntry,
}

impl<'r> Path<'r> {
    pub(crate) fn new(registry: &'r SchemaRegistry, entry: &'r PathEntry) -> Self {
        Self { registry, entry }
    }

    pub fn alias(&self) -> &'r str {
        &self.entry.alias
    }

    pub fn ignore(&self) -> bool {
        self.entry.ignore
    }

    pub fn entry(&self) -> &'r PathEntry {
        self.entry
    }

    /// First attribute of the chain, declared on the owning type (or a base).
    pub fn root(&self) -> Property<'r> {
        Property::new(self.registry, self.entry.root_id())
    }

    pub fn leaf(&self) -> Property<'r> {
        Property::new(self.registry, self.entry.leaf_id())
    }

    pub fn attributes(&self) -> impl Iterator<Item = Property<'r>> + use<'r> {
        let registry = self.registry;
        self.entry.path.iter().map(move |id| Property::new(registry, *id))
    }
}

impl fmt::Debug for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("alias", &self.entry.alias)
            .field("ignore", &self.entry.ignore)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(alias: &str) -> PathEntry {
        PathEntry {
            alias: alias.to_string(),
            path: vec![PropertyId::new(TypeIndex(0), 0)],
            ignore: false,
        }
    }

    #[test]
    fn test_prefix_matches_on_segment_boundary() {
        assert!(entry("Address/City").is_below("Address"));
        assert!(entry("Address").is_below("Address"));
        assert!(!entry("AddressLine").is_below("Address"));
        assert!(!entry("Name").is_below("Address"));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut index = PathIndex::default();
        index.push("Order", entry("Id")).unwrap();
        let err = index.push("Order", entry("Id")).unwrap_err();
        assert_eq!(err, ModelError::DuplicateName("Order".into(), "Id".into()));
        assert!(index.get("Id").is_some());
        assert_eq!(index.entries().len(), 1);
    }
}
