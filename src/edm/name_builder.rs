use crate::metamodel::{Attribute, ManagedType};
use serde::{Deserialize, Serialize};

/// How default external names are derived from internal names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NameStyle {
    /// First character upper-cased: `roles` -> `Roles`.
    #[default]
    Pascal,
    /// Internal name used unchanged.
    AsDeclared,
}

/// Builds the default external names of types and properties.
#[derive(Debug, Clone)]
pub struct NameBuilder {
    namespace: String,
    style: NameStyle,
    quote_db_identifiers: bool,
}

impl NameBuilder {
    pub fn new(namespace: impl Into<String>, style: NameStyle, quote_db_identifiers: bool) -> Self {
        Self {
            namespace: namespace.into(),
            style,
            quote_db_identifiers,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_name(&self, managed: &ManagedType) -> String {
        managed.simple_name().to_string()
    }

    pub fn property_name(&self, attribute: &Attribute) -> String {
        self.styled(&attribute.name)
    }

    pub fn navigation_property_name(&self, attribute: &Attribute) -> String {
        self.styled(&attribute.name)
    }

    pub fn db_field_name(&self, attribute: &Attribute) -> String {
        let name = attribute.column_name.as_deref().unwrap_or(&attribute.name);
        if self.quote_db_identifiers && !name.starts_with('"') {
            format!("\"{name}\"")
        } else {
            name.to_string()
        }
    }

    /// Namespace-qualified name.
    pub fn fqn(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    fn styled(&self, internal_name: &str) -> String {
        match self.style {
            NameStyle::Pascal => first_to_upper(internal_name),
            NameStyle::AsDeclared => internal_name.to_string(),
        }
    }
}

pub fn first_to_upper(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
